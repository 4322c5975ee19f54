use std::fmt;

use crate::{entry::BibEntry, normalize::normalize};

/// Words skipped when picking the title part.
const BORING_WORDS: &[&str] = &["the", "an", "a", "on"];

/// `author-year-title` identifier of an entry, used as its note's filename stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slug {
    pub author: String,
    pub year: String,
    pub title: String,
}

impl Slug {
    pub fn of(entry: &BibEntry) -> Self {
        Slug {
            author: author_part(entry).unwrap_or_else(|| "noauthor".to_string()),
            year: year_part(entry).unwrap_or_else(|| "noyear".to_string()),
            title: title_part(entry).unwrap_or_else(|| "notitle".to_string()),
        }
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.author, self.year, self.title)
    }
}

// First family-name component only, matching the family half of `Person::id`.
fn author_part(entry: &BibEntry) -> Option<String> {
    let family = entry.authors()?.first()?.family.first()?;
    Some(normalize(family)).filter(|s| !s.is_empty())
}

// Taken verbatim, so suffixes like "1843a" survive.
fn year_part(entry: &BibEntry) -> Option<String> {
    entry
        .get("year")
        .filter(|y| !y.is_empty())
        .map(str::to_string)
}

fn title_part(entry: &BibEntry) -> Option<String> {
    entry
        .get("title")?
        .split(' ')
        .map(normalize)
        .find(|w| !w.is_empty() && !BORING_WORDS.contains(&w.as_str()))
}
