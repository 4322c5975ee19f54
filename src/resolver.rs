use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::Error;

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Anything that can turn an identifier into raw citation text.
pub trait Lookup {
    fn lookup(&self, identifier: &str) -> Result<String, Error>;
}

/// A DOI split into its registrant prefix and item suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Doi {
    prefix: String,
    suffix: String,
}

type ParserFn = fn(&str) -> Option<Doi>;

/// Identifier parsers, tried in order. A real DOI is taken as-is before any arXiv mapping.
static PARSERS: &[ParserFn] = &[Doi::parse, Doi::from_arxiv];

/// Guess what kind of identifier `identifier` is and map it to a DOI.
pub fn parse(identifier: &str) -> Option<Doi> {
    PARSERS.iter().find_map(|f| f(identifier))
}

/// `doi:`-style scheme prefixes accepted in front of a bare DOI.
const SCHEMES: &[&str] = &["doi:", "DOI:", "urn:doi:", "URN:DOI:"];

/// Resolver URL prefixes whose path is the DOI itself.
const RESOLVERS: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

impl Doi {
    /// Parse a DOI, optionally behind a `doi:` scheme or a resolver URL.
    ///
    /// Everything after `10.NNNN/` is the suffix, unchanged: SICI-style DOIs carry `<`, `>` and
    /// `;` and must reach the resolver whole.
    pub fn parse(identifier: &str) -> Option<Self> {
        let s = identifier.trim();
        let s = SCHEMES
            .iter()
            .find_map(|scheme| s.strip_prefix(scheme))
            .map_or(s, str::trim_start);
        let s = match RESOLVERS.iter().find_map(|host| s.strip_prefix(host)) {
            // Only a URL has a query or fragment of its own to drop.
            Some(path) => path.split(['?', '#']).next().unwrap_or(path),
            None => s,
        };

        static DOI_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(10\.\d{4,}(?:\.\d+)*)/(\S+)$").unwrap());

        let caps = DOI_RE.captures(s)?;
        Some(Doi {
            prefix: caps[1].to_string(),
            suffix: caps[2].to_string(),
        })
    }

    /// Map a new-style arXiv identifier or abstract/PDF URL to its DataCite DOI.
    pub fn from_arxiv(identifier: &str) -> Option<Self> {
        let mut s = identifier.trim();

        if let Some(rest) = s
            .strip_prefix("arXiv:")
            .or_else(|| s.strip_prefix("arxiv:"))
        {
            s = rest.trim_start();
        }

        if let Some(path) = s
            .strip_prefix("https://arxiv.org/")
            .or_else(|| s.strip_prefix("http://arxiv.org/"))
        {
            let path = path.split(['?', '#']).next().unwrap_or(path);
            s = if let Some(rest) = path.strip_prefix("abs/") {
                rest
            } else if let Some(rest) = path.strip_prefix("pdf/") {
                rest.strip_suffix(".pdf").unwrap_or(rest)
            } else {
                return None;
            };
        }

        // YYMM.NNNN or YYMM.NNNNN, optionally versioned. The DOI names the unversioned record.
        static NEWSTYLE_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(?P<core>\d{4}\.[0-9]{4,5})(?:v\d+)?$").unwrap());

        let core = NEWSTYLE_RE.captures(s.trim_matches('/'))?.name("core")?;
        Some(Doi {
            prefix: "10.48550".to_string(),
            suffix: format!("arXiv.{}", core.as_str()),
        })
    }

    pub fn to_url(&self) -> Url {
        let enc_suffix = utf8_percent_encode(&self.suffix, PATH_SEGMENT_ENCODE_SET).to_string();
        // The prefix is `10.` plus digits and the suffix is percent-encoded, so this always parses.
        Url::parse(&format!("https://doi.org/{}/{}", self.prefix, enc_suffix)).unwrap()
    }
}

/// Resolves identifiers through doi.org content negotiation.
#[derive(Debug, Default)]
pub struct DoiResolver;

impl Lookup for DoiResolver {
    fn lookup(&self, identifier: &str) -> Result<String, Error> {
        let doi =
            parse(identifier).ok_or_else(|| Error::UnrecognisedIdentifier(identifier.to_string()))?;
        let url = doi.to_url();
        debug!(%url, "requesting BibTeX");

        let lookup_error = |source| Error::Lookup {
            identifier: identifier.to_string(),
            source,
        };
        ureq::get(url.as_str())
            .header("Accept", "application/x-bibtex")
            .header("User-Agent", concat!("bib2tree/", env!("CARGO_PKG_VERSION")))
            .call()
            .map_err(lookup_error)?
            .body_mut()
            .read_to_string()
            .map_err(lookup_error)
    }
}
