use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Extension of every note written.
pub const EXTENSION: &str = "tree";

/// A note ready to be written: filename stem plus forester markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub stem: String,
    pub content: String,
}

/// What happened to a note on disk.
#[derive(Debug)]
pub enum Outcome {
    Written(PathBuf),
    /// The path already existed and was left untouched.
    Skipped(PathBuf),
}

impl Note {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, EXTENSION)
    }

    /// Write the note into `dir` unless a file of the same name is already there.
    ///
    /// Existing files are never opened for writing: `create_new` fails atomically instead, and
    /// that failure is reported as [`Outcome::Skipped`].
    pub fn write_once(&self, dir: &Path) -> io::Result<Outcome> {
        let path = dir.join(self.file_name());
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(self.content.as_bytes())?;
                Ok(Outcome::Written(path))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Outcome::Skipped(path)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn note(content: &str) -> Note {
        Note {
            stem: "lovelace-1843-notes".into(),
            content: content.into(),
        }
    }

    #[test]
    fn second_write_is_skipped_and_content_kept() {
        let dir = TempDir::new().expect("tmp dir");
        let first = note("first").write_once(dir.path()).expect("write");
        assert!(matches!(first, Outcome::Written(_)));

        let second = note("second").write_once(dir.path()).expect("write");
        let Outcome::Skipped(path) = second else {
            panic!("expected skip");
        };
        assert_eq!(path, dir.path().join("lovelace-1843-notes.tree"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "first");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().expect("tmp dir");
        let err = note("x").write_once(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
