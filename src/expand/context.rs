//! The read-only record threaded through a single expansion pass
//! (spec.md §3 "Expansion context").

use std::collections::HashMap;

/// Environment map, exit status, pid, positional parameters, and a
/// per-user-home resolver hook — everything variable/tilde/command
/// expansion needs, all read-only for the duration of one pass.
pub struct ExpansionContext {
    pub env: HashMap<String, String>,
    pub last_exit_code: i32,
    pub pid: u32,
    /// `positional[0]` is `$0` (the shell name); `positional[1..]` are
    /// `$1`..`$9` and beyond.
    pub positional: Vec<String>,
    pub last_background_pid: Option<u32>,
    /// Per-user home directory lookup for `~user`. Resolving an arbitrary
    /// OS user database is outside this crate's scope (see SPEC_FULL.md
    /// §1); callers that need it supply this hook, otherwise `~user`
    /// falls back to the literal text per spec.md §4.6.
    pub user_home_lookup: Option<Box<dyn Fn(&str) -> Option<String>>>,
}

impl ExpansionContext {
    pub fn new(env: HashMap<String, String>) -> Self {
        Self {
            env,
            last_exit_code: 0,
            pid: std::process::id(),
            positional: vec![String::new()],
            last_background_pid: None,
            user_home_lookup: None,
        }
    }

    pub fn get_env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn home(&self) -> Option<&str> {
        self.get_env("HOME")
    }
}
