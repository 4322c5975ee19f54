use crate::{entry::BibEntry, note::Note, slug::Slug};

/// The single `\meta` line pointing at where the work lives online.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalLink {
    pub key: &'static str,
    pub value: String,
}

type LinkRule = fn(&BibEntry) -> Option<ExternalLink>;

/// Candidate sources for the external link.
///
/// NOTE: Ordering is important here, as it signifies priority. The first rule that matches wins
/// and the remaining ones are never consulted.
static LINK_RULES: &[LinkRule] = &[doi_link, upper_doi_link, url_link, arxiv_link];

fn doi_link(entry: &BibEntry) -> Option<ExternalLink> {
    entry.get("doi").map(|v| ExternalLink {
        key: "doi",
        value: v.to_string(),
    })
}

fn upper_doi_link(entry: &BibEntry) -> Option<ExternalLink> {
    entry.get("DOI").map(|v| ExternalLink {
        key: "doi",
        value: v.to_string(),
    })
}

fn url_link(entry: &BibEntry) -> Option<ExternalLink> {
    entry.get("url").map(|v| ExternalLink {
        key: "external",
        value: v.to_string(),
    })
}

// BibTeX marks arXiv preprints with `archiveprefix`, BibLaTeX with `eprinttype`.
fn arxiv_link(entry: &BibEntry) -> Option<ExternalLink> {
    let eprint = entry.get("eprint")?;
    let is_arxiv = ["archiveprefix", "eprinttype"]
        .iter()
        .any(|k| entry.get(k) == Some("arXiv"));
    is_arxiv.then(|| ExternalLink {
        key: "external",
        value: format!("https://arxiv.org/abs/{eprint}"),
    })
}

pub fn external_link(entry: &BibEntry) -> Option<ExternalLink> {
    LINK_RULES.iter().find_map(|rule| rule(entry))
}

/// Shortest run of `>` (at least two) that does not occur in `text`.
fn verbatim_delimiter(text: &str) -> String {
    let mut delim = ">>".to_string();
    while text.contains(&delim) {
        delim.push('>');
    }
    delim
}

/// Render a reference note for `entry`, named by its slug.
///
/// The embedded BibTeX is keyed by the slug too, so the citation key matches the file.
pub fn render(entry: &BibEntry) -> Note {
    let stem = Slug::of(entry).to_string();

    let mut out = String::new();
    if let Some(title) = entry.get("title") {
        out.push_str(&format!("\\title{{{title}}}\n"));
    }
    for id in entry.authors().unwrap_or_default().iter().filter_map(|p| p.id()) {
        out.push_str(&format!("\\author{{{id}}}\n"));
    }
    if let Some(year) = entry.get("year") {
        out.push_str(&format!("\\date{{{year}}}\n"));
    }
    out.push_str("\\taxon{reference}\n");
    if let Some(link) = external_link(entry) {
        out.push_str(&format!("\\meta{{{}}}{{{}}}\n", link.key, link.value));
    }
    let citation = entry.to_citation_text(&stem);
    let delim = verbatim_delimiter(&citation);
    out.push_str(&format!("\\meta{{bibtex}}{{\\verb{delim}|\n{citation}{delim}}}"));

    Note { stem, content: out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Person;

    fn link_lines(note: &Note) -> Vec<&str> {
        note.content
            .lines()
            .filter(|l| l.starts_with("\\meta{") && !l.starts_with("\\meta{bibtex}"))
            .collect()
    }

    #[test]
    fn renders_full_entry_in_order() {
        let e = BibEntry::new("ada", "article")
            .with_authors(vec![
                Person::new(&["Ada"], &["Lovelace"]),
                Person::new(&["Charles"], &["Babbage"]),
            ])
            .with_field("year", "1843")
            .with_field("title", "Notes on the Analytical Engine")
            .with_field("doi", "10.1000/xyz");
        let note = render(&e);
        assert_eq!(note.stem, "lovelace-1843-notes");
        assert_eq!(note.file_name(), "lovelace-1843-notes.tree");
        let expected = "\\title{Notes on the Analytical Engine}\n\
            \\author{ada-lovelace}\n\
            \\author{charles-babbage}\n\
            \\date{1843}\n\
            \\taxon{reference}\n\
            \\meta{doi}{10.1000/xyz}\n\
            \\meta{bibtex}{\\verb>>|\n\
            @article{lovelace-1843-notes,\n    \
            author = {Ada Lovelace and Charles Babbage},\n    \
            doi = {10.1000/xyz},\n    \
            title = {Notes on the Analytical Engine},\n    \
            year = {1843},\n\
            }\n\
            >>}";
        assert_eq!(note.content, expected);
    }

    #[test]
    fn bare_entry_keeps_mandatory_lines() {
        let note = render(&BibEntry::new("k", "misc"));
        assert_eq!(note.stem, "noauthor-noyear-notitle");
        assert_eq!(
            note.content,
            "\\taxon{reference}\n\\meta{bibtex}{\\verb>>|\n@misc{noauthor-noyear-notitle,\n}\n>>}"
        );
    }

    #[test]
    fn embedded_bibtex_is_keyed_by_slug() {
        let entries = crate::entry::parse_bibliography(
            "@article{orig_key, author = {Lovelace, Ada}, title = {Notes on the Analytical Engine}, year = {1843}}",
        )
        .expect("parse");
        let note = render(&entries[0]);
        assert_eq!(note.stem, "lovelace-1843-notes");
        assert!(note.content.contains("\\verb>>|\n@article{lovelace-1843-notes,\n"));
        assert!(!note.content.contains("orig_key"));
        assert_eq!(entries[0].key, "orig_key");
    }

    #[test]
    fn doi_beats_url() {
        let e = BibEntry::new("k", "misc")
            .with_field("url", "https://example.com")
            .with_field("doi", "10.1/a");
        assert_eq!(link_lines(&render(&e)), vec!["\\meta{doi}{10.1/a}"]);
    }

    #[test]
    fn link_priority_ladder() {
        let arxiv = BibEntry::new("k", "misc")
            .with_field("eprint", "2301.00001")
            .with_field("archiveprefix", "arXiv");
        assert_eq!(
            external_link(&arxiv).unwrap().value,
            "https://arxiv.org/abs/2301.00001"
        );

        let url = arxiv.clone().with_field("url", "https://example.com");
        assert_eq!(external_link(&url).unwrap().value, "https://example.com");

        let upper = url.clone().with_field("DOI", "10.2/B");
        assert_eq!(
            external_link(&upper),
            Some(ExternalLink {
                key: "doi",
                value: "10.2/B".into()
            })
        );

        let lower = upper.with_field("doi", "10.1/a");
        assert_eq!(external_link(&lower).unwrap().value, "10.1/a");
        assert_eq!(link_lines(&render(&lower)).len(), 1);
    }

    #[test]
    fn eprint_needs_arxiv_prefix() {
        let e = BibEntry::new("k", "misc").with_field("eprint", "2301.00001");
        assert_eq!(external_link(&e), None);
        let e = e.with_field("archiveprefix", "HAL");
        assert_eq!(external_link(&e), None);
        let e = e.with_field("eprinttype", "arXiv");
        assert!(external_link(&e).is_some());
    }

    #[test]
    fn delimiter_avoids_content() {
        let e = BibEntry::new("k", "misc").with_field("note", "a >> b >>> c");
        let note = render(&e);
        assert!(note.content.contains("\\verb>>>>|\n"));
        assert!(note.content.ends_with(">>>>}"));
    }

    #[test]
    fn delimiter_never_occurs_in_text() {
        proptest::proptest!(|(s in "[a>|}]{0,24}")| {
            let d = verbatim_delimiter(&s);
            proptest::prop_assert!(!s.contains(&d));
        })
    }

    #[test]
    fn authors_without_letters_are_not_declared() {
        let e = BibEntry::new("k", "misc").with_authors(vec![Person::new(&[], &["{}"])]);
        assert!(!render(&e).content.contains("\\author"));
    }
}
