use std::{
    fs,
    path::{Path, PathBuf},
};

use owo_colors::{OwoColorize, Stream};
use tracing::{debug, info};

use crate::{
    Error,
    entry::{BibEntry, parse_bibliography},
    note::Outcome,
    person,
    render::render,
    resolver::Lookup,
};

/// Where citation text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Identifier(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub source: Option<Source>,
    /// Directory reference notes are written to.
    pub dest: PathBuf,
    /// Directory person notes are written to, if any.
    pub people: Option<PathBuf>,
}

/// Tally of everything a run did to disk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl Report {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Written(path) => {
                println!(
                    "{} writing {}",
                    "✓".if_supports_color(Stream::Stdout, |t| t.green()),
                    path.display()
                );
                self.written.push(path);
            }
            Outcome::Skipped(path) => {
                println!(
                    "{} skipping {} (already exists)",
                    "↷".if_supports_color(Stream::Stdout, |t| t.yellow()),
                    path.display()
                );
                self.skipped.push(path);
            }
        }
    }

    fn fail(&mut self, path: PathBuf, err: std::io::Error) {
        eprintln!(
            "{} failed to write {}: {err}",
            "✗".if_supports_color(Stream::Stderr, |t| t.red()),
            path.display()
        );
        self.failed.push(path);
    }

    /// One-line summary, e.g. `✓ 3 ↷ 1 ✗ 0`.
    pub fn summary(&self) -> String {
        format!(
            "✓ {} ↷ {} ✗ {}",
            self.written.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Read the citation text, either from disk or through `lookup`.
pub fn acquire(source: &Source, lookup: &dyn Lookup) -> Result<String, Error> {
    match source {
        Source::File(path) => fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        }),
        Source::Identifier(id) => lookup.lookup(id),
    }
}

fn ensure_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the notes for one entry: its authors' person notes first, then the reference note.
fn convert_entry(entry: &BibEntry, config: &Config, report: &mut Report) {
    let note = render(entry);
    debug!(key = %entry.key, stem = %note.stem, "rendered entry");

    if let Some(people) = &config.people {
        for author in entry.authors().unwrap_or_default() {
            match person::emit(people, author) {
                Ok(Some(outcome)) => report.record(outcome),
                Ok(None) => debug!(key = %entry.key, "author without a usable name"),
                Err(e) => report.fail(
                    people.join(person::note(author).map(|n| n.file_name()).unwrap_or_default()),
                    e,
                ),
            }
        }
    }

    match note.write_once(&config.dest) {
        Ok(outcome) => report.record(outcome),
        Err(e) => report.fail(config.dest.join(note.file_name()), e),
    }
}

/// Convert already-acquired citation text into notes.
pub fn convert(text: &str, config: &Config) -> Result<Report, Error> {
    let entries = parse_bibliography(text)?;
    info!(count = entries.len(), "parsed bibliography");

    ensure_dir(&config.dest)?;
    if let Some(people) = &config.people {
        ensure_dir(people)?;
    }

    let mut report = Report::default();
    for entry in &entries {
        convert_entry(entry, config, &mut report);
    }
    Ok(report)
}

/// Run a whole batch: acquire, parse, then render and write every entry.
///
/// Acquisition and parse errors abort the run before anything is written. Per-file problems are
/// recorded in the [`Report`] and the batch carries on.
pub fn run(config: &Config, lookup: &dyn Lookup) -> Result<Report, Error> {
    let source = config.source.as_ref().ok_or(Error::NoInput)?;
    let text = acquire(source, lookup)?;
    convert(&text, config)
}
