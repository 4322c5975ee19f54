//! Turn BibTeX entries into forester trees.
//!
//! Every entry becomes one `<author>-<year>-<title>.tree` reference note; optionally every author
//! gets a `<given>-<family>.tree` person note. Nothing that already exists on disk is overwritten.

pub mod cli;
pub mod driver;
pub mod entry;
mod error;
pub mod normalize;
pub mod note;
pub mod person;
pub mod render;
pub mod resolver;
pub mod slug;

pub use error::Error;
