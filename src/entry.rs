use std::collections::BTreeMap;

use biblatex::{Bibliography, ChunksExt};

use crate::{Error, normalize::normalize};

/// A parsed bibliography entry.
///
/// Field values are kept verbatim. Authors are split out of the field map because they are the
/// only field the notes care about structurally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BibEntry {
    pub key: String,
    pub entry_type: String,
    fields: BTreeMap<String, String>,
    authors: Option<Vec<Person>>,
}

/// A name split into its BibTeX parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Person {
    pub given: Vec<String>,
    pub prefix: Vec<String>,
    pub family: Vec<String>,
    pub suffix: Vec<String>,
}

impl BibEntry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        BibEntry {
            key: key.into(),
            entry_type: entry_type.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_authors(mut self, authors: Vec<Person>) -> Self {
        self.authors = Some(authors);
        self
    }

    /// Field lookup. Names are case-sensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// `None` when the entry has no `author` field at all.
    pub fn authors(&self) -> Option<&[Person]> {
        self.authors.as_deref()
    }

    /// Serialise back into BibTeX under `key`, with every author merged into a single display
    /// name. The entry's own key is left untouched.
    pub fn to_citation_text(&self, key: &str) -> String {
        let mut fields: Vec<(&str, String)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        if let Some(authors) = &self.authors {
            let merged = authors
                .iter()
                .map(Person::display)
                .collect::<Vec<_>>()
                .join(" and ");
            fields.push(("author", merged));
        }
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = format!("@{}{{{},\n", self.entry_type, key);
        for (name, value) in fields {
            out.push_str(&format!("    {name} = {{{value}}},\n"));
        }
        out.push_str("}\n");
        out
    }
}

impl Person {
    pub fn new(given: &[&str], family: &[&str]) -> Self {
        Person {
            given: given.iter().map(|s| s.to_string()).collect(),
            family: family.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// "First name first" form, e.g. `Ludwig van Beethoven, Jr.`.
    pub fn display(&self) -> String {
        let name = self
            .given
            .iter()
            .chain(&self.prefix)
            .chain(&self.family)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if self.suffix.is_empty() {
            name
        } else {
            format!("{}, {}", name, self.suffix.join(" "))
        }
    }

    /// Normalised first given name and first family name, dash-joined.
    ///
    /// A missing part is left out rather than producing a dangling dash. `None` when neither part
    /// has any letters.
    pub fn id(&self) -> Option<String> {
        let parts: Vec<String> = [self.given.first(), self.family.first()]
            .into_iter()
            .flatten()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("-"))
        }
    }
}

impl From<&biblatex::Person> for Person {
    fn from(p: &biblatex::Person) -> Self {
        fn words(s: &str) -> Vec<String> {
            s.split_whitespace().map(str::to_string).collect()
        }
        Person {
            given: words(&p.given_name),
            prefix: words(&p.prefix),
            family: words(&p.name),
            suffix: words(&p.suffix),
        }
    }
}

impl From<&biblatex::Entry> for BibEntry {
    fn from(entry: &biblatex::Entry) -> Self {
        let fields = entry
            .fields
            .iter()
            .filter(|(name, _)| name.as_str() != "author")
            .map(|(name, chunks)| (name.clone(), chunks.format_verbatim()))
            .collect();
        // An unparseable author list is kept as "present but empty".
        let authors = entry.fields.contains_key("author").then(|| {
            entry
                .author()
                .map(|people| people.iter().map(Person::from).collect())
                .unwrap_or_default()
        });
        BibEntry {
            key: entry.key.clone(),
            entry_type: entry.entry_type.to_string(),
            fields,
            authors,
        }
    }
}

/// Parse BibTeX/BibLaTeX text into entries, in file order.
pub fn parse_bibliography(text: &str) -> Result<Vec<BibEntry>, Error> {
    let bib = Bibliography::parse(text).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(bib.iter().map(BibEntry::from).collect())
}
