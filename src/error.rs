use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Neither a bibliography file nor an identifier was given.
    #[error("no input given: pass --bibfile <FILE> or --doi <ID>")]
    NoInput,

    #[error("unrecognised identifier: {0}")]
    UnrecognisedIdentifier(String),

    #[error("lookup of {identifier} failed")]
    Lookup {
        identifier: String,
        #[source]
        source: ureq::Error,
    },

    #[error("failed to parse citation text: {0}")]
    Parse(String),

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
