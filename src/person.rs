//! Companion notes for authors.
//!
//! A person note is named by [`Person::id`], so every entry by the same author points at the same
//! file. Deduplication is nothing more than the write-once guard in [`Note::write_once`]: the first
//! occurrence writes, every later one (in this run or a later run) finds the file and skips it.

use std::{io, path::Path};

use crate::{
    entry::Person,
    note::{Note, Outcome},
};

/// Build the note for `person`, or `None` if the name has no letters to build an id from.
pub fn note(person: &Person) -> Option<Note> {
    let stem = person.id()?;
    Some(Note {
        stem,
        content: format!("\\title{{{}}}\n\\taxon{{person}}\n", person.display()),
    })
}

/// Write the note for `person` into `dir` unless one already exists.
pub fn emit(dir: &Path, person: &Person) -> io::Result<Option<Outcome>> {
    note(person).map(|n| n.write_once(dir)).transpose()
}
