//! L3: filesystem glob expansion — `*`, `?`, bracket classes, extglob.
//!
//! No direct teacher analog (the teacher matches against an in-memory
//! directory listing for its fuzzy filter, never against disk paths for
//! command-line expansion); `matcher` reuses the teacher's idea of
//! compiling a glob to a `regex::Regex` (`utils::glob_to_regex`) but
//! extends it to the fuller extglob grammar this crate needs, and
//! `fswalk` is a new directory-walking layer on top.

pub mod fswalk;
pub mod matcher;
pub mod pattern;

/// Expands a single already variable-expanded word against the
/// filesystem, falling back to the literal word when it contains no glob
/// meta-characters or when nothing matches.
pub fn expand(word: &str) -> Vec<String> {
    fswalk::expand(word)
}
