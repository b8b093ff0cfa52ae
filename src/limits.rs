//! Load-bearing tunables.
//!
//! The spec flags these caps as "arbitrary but load-bearing": keep them (or
//! document a replacement) rather than silently drop them. They live here,
//! grouped in one place, rather than as a config file — full user-facing
//! configuration is out of scope for this crate (see SPEC_FULL.md §2.3).

/// Minimum required capacity of the line editor's edit buffer.
pub const EDIT_BUFFER_CAPACITY: usize = 4096;

/// Default number of entries the history ring holds before evicting.
pub const HISTORY_CAPACITY: usize = 1000;

/// Numeric brace sequences (`{1..1000}`) longer than this collapse to the
/// literal text instead of expanding.
pub const BRACE_NUMERIC_LIMIT: usize = 1000;

/// Character brace sequences (`{a..z}`) longer than this collapse to the
/// literal text instead of expanding.
pub const BRACE_CHAR_LIMIT: usize = 52;

/// Per-call cap on the number of filesystem matches a glob expansion returns.
pub const GLOB_MATCH_CAP: usize = 256;

/// Recursion depth cap for extglob alternative/suffix matching.
pub const EXTGLOB_RECURSION_LIMIT: usize = 64;

/// Intermediate buffer size for a single variable-expansion step.
pub const VAR_EXPANSION_LIMIT: usize = 4096;

/// Maximum bytes captured from a `$(...)` command substitution's stdout.
pub const COMMAND_SUBST_OUTPUT_CAP: usize = 1024 * 1024;

/// Raw-mode read timeout, in milliseconds, used for both the VTIME-style
/// Unix termios timeout and the poll loop's sleep-and-retry.
pub const RAW_READ_TIMEOUT_MS: u64 = 100;

/// Capacity of the Windows per-thread environment-variable LRU cache.
pub const WINDOW_ENV_CACHE_SIZE: usize = 32;

/// Buffered-I/O chunk size for both the read and write sides.
pub const IO_BUFFER_SIZE: usize = 8192;
