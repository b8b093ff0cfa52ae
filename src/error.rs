//! Crate-wide error type.
//!
//! Mirrors the shape of a small `thiserror` enum plus a `Result` alias, the
//! same pattern the rest of the ambient stack (config loaders, expanders)
//! is written against.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellCoreError {
    #[error("line editing was interrupted")]
    Interrupted,

    #[error("terminal is not available (not a tty)")]
    TerminalNotAvailable,

    #[error("ioctl/console query failed: {0}")]
    IoctlFailed(String),

    #[error("expansion exceeded its intermediate buffer limit")]
    ExpansionTooLong,

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShellCoreError>;
