//! Input-editing and expansion core for an interactive command-line
//! shell: a raw-mode line editor with history and programmable
//! completion, a history/brace/variable/glob expansion pipeline, and the
//! terminal-control substrate both rely on.
//!
//! The parser, executor, job control, config loading, builtin table, and
//! CLI dispatch are all external collaborators this crate hands finished
//! argument vectors to; none of them live here.

pub mod editor;
pub mod error;
pub mod expand;
pub mod highlight;
pub mod history;
pub mod io_buf;
pub mod limits;
pub mod terminal;

pub use error::{Result, ShellCoreError};
