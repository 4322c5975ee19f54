use std::path::PathBuf;

use clap::Parser;

use crate::driver::{Config, Source};

/// Convert BibTeX entries into forester trees, one per reference.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bibliography file to convert
    #[arg(short, long, value_name = "FILE")]
    pub bibfile: Option<PathBuf>,

    /// DOI (or doi.org URL, or arXiv id) to fetch and convert; ignored when --bibfile is given
    #[arg(short, long, value_name = "ID")]
    pub doi: Option<String>,

    /// Also write a tree for every author into this directory
    #[arg(short, long, value_name = "DIR")]
    pub people: Option<PathBuf>,

    /// Directory the reference trees are written to
    #[arg(value_name = "DESTDIR")]
    pub destdir: PathBuf,
}

impl Cli {
    /// The bibliography file wins over the identifier when both are given.
    pub fn source(&self) -> Option<Source> {
        self.bibfile
            .clone()
            .map(Source::File)
            .or_else(|| self.doi.clone().map(Source::Identifier))
    }

    pub fn into_config(self) -> Config {
        Config {
            source: self.source(),
            dest: self.destdir,
            people: self.people,
        }
    }
}
