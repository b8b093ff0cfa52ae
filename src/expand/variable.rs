//! L3: variable, tilde, and command-substitution expansion.
//!
//! Runs after brace expansion, once per word. `$(cmd)` shells out via
//! `std::process::Command` — the plain one-shot-capture case the teacher
//! itself falls back to (`resolve_shell`/`shell_command_flag` in
//! `main.rs`), as opposed to the bidirectional PTY it reserves for the
//! interactive embedded shell.

use std::process::Command;

use crate::limits::{COMMAND_SUBST_OUTPUT_CAP, VAR_EXPANSION_LIMIT};

use super::context::ExpansionContext;

/// Picks the shell used to run a `$(cmd)` substitution, following the
/// teacher's `resolve_shell` preference order.
fn system_shell() -> String {
    if cfg!(windows) {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    } else {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
    }
}

fn shell_command_flag(shell: &str) -> &'static str {
    let lower = shell.to_lowercase();
    if lower.contains("powershell") || lower.contains("pwsh") {
        "-Command"
    } else if cfg!(windows) {
        "/C"
    } else {
        "-c"
    }
}

/// Runs `cmd` via the system shell, captures stdout (capped), trims
/// trailing newlines, and returns it. Failure (spawn error, non-UTF8
/// output, or an I/O error) yields an empty string per spec.md §4.6.
fn run_command_substitution(cmd: &str) -> String {
    let shell = system_shell();
    let flag = shell_command_flag(&shell);
    match Command::new(&shell).arg(flag).arg(cmd).output() {
        Ok(output) => {
            let mut bytes = output.stdout;
            bytes.truncate(COMMAND_SUBST_OUTPUT_CAP);
            let text = String::from_utf8_lossy(&bytes);
            text.trim_end_matches('\n').to_string()
        }
        Err(_) => String::new(),
    }
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_var_name(chars: &[char], start: usize) -> (String, usize) {
    let mut j = start;
    while j < chars.len() && is_var_char(chars[j]) {
        j += 1;
    }
    (chars[start..j].iter().collect(), j)
}

/// Finds the matching `)` for a `$(` command substitution starting right
/// after the `(`, respecting nested parens.
fn find_matching_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 1;
    let mut j = open + 1;
    while j < chars.len() {
        match chars[j] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

fn find_matching_brace(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 1;
    let mut j = open + 1;
    while j < chars.len() {
        match chars[j] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Expands a single `$...` form starting at `chars[i]` (`chars[i] == '$'`).
/// Returns `(replacement, chars_consumed)`, or `None` if `$` doesn't begin
/// a recognized form (left as a literal `$`).
fn expand_dollar(chars: &[char], i: usize, ctx: &ExpansionContext) -> Option<(String, usize)> {
    let j = i + 1;
    if j >= chars.len() {
        return None;
    }
    match chars[j] {
        '?' => Some((ctx.last_exit_code.to_string(), 2)),
        '$' => Some((ctx.pid.to_string(), 2)),
        '!' => Some((
            ctx.last_background_pid.map(|p| p.to_string()).unwrap_or_default(),
            2,
        )),
        '#' => Some(((ctx.positional.len().saturating_sub(1)).to_string(), 2)),
        '*' | '@' => {
            let args = ctx.positional.get(1..).map(|s| s.join(" ")).unwrap_or_default();
            Some((args, 2))
        }
        '0' => Some((ctx.positional.first().cloned().unwrap_or_default(), 2)),
        c if c.is_ascii_digit() && c != '0' => {
            let idx = c.to_digit(10).unwrap() as usize;
            Some((ctx.positional.get(idx).cloned().unwrap_or_default(), 2))
        }
        '(' => {
            let close = find_matching_paren(chars, j)?;
            let inner: String = chars[j + 1..close].iter().collect();
            Some((run_command_substitution(&inner), close + 1 - i))
        }
        '{' => {
            let close = find_matching_brace(chars, j)?;
            let inner: String = chars[j + 1..close].iter().collect();
            Some((expand_braced_var(&inner, ctx), close + 1 - i))
        }
        c if is_var_char(c) && !c.is_ascii_digit() => {
            let (name, end) = parse_var_name(chars, j);
            Some((ctx.get_env(&name).unwrap_or("").to_string(), end - i))
        }
        _ => None,
    }
}

/// `${VAR}` or `${VAR:-default}`.
fn expand_braced_var(content: &str, ctx: &ExpansionContext) -> String {
    if let Some((name, default)) = content.split_once(":-") {
        match ctx.get_env(name) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => expand(default, ctx),
        }
    } else {
        ctx.get_env(content).unwrap_or("").to_string()
    }
}

fn is_tilde_boundary(prev: Option<char>) -> bool {
    matches!(prev, None | Some(':') | Some('='))
}

/// Expands a leading `~`/`~user` starting at `chars[i]`. Returns
/// `(replacement, chars_consumed)`.
fn expand_tilde(chars: &[char], i: usize, ctx: &ExpansionContext) -> (String, usize) {
    let mut j = i + 1;
    while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_' || chars[j] == '-') {
        j += 1;
    }
    let name: String = chars[i + 1..j].iter().collect();
    if name.is_empty() {
        if let Some(home) = ctx.home() {
            return (home.to_string(), j - i);
        }
        return ("~".to_string(), 1);
    }
    if let Some(lookup) = &ctx.user_home_lookup {
        if let Some(home) = lookup(&name) {
            return (home, j - i);
        }
    }
    (chars[i..j].iter().collect(), j - i)
}

/// Expands `$VAR`/`${...}`/`$(...)`/`~` in `word`. Single quotes suppress
/// all expansion; double quotes allow `$`-expansion and command
/// substitution (glob/brace are the caller's concern, not suppressed or
/// performed here). A backslash before `$` suppresses one expansion and is
/// itself kept, matching the source shell's documented quirk.
pub fn expand(word: &str, ctx: &ExpansionContext) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = 0;
    let mut prev_boundary: Option<char> = None;

    while i < chars.len() {
        if out.len() > VAR_EXPANSION_LIMIT {
            return word.to_string();
        }
        let c = chars[i];

        if c == '\'' && !in_double {
            in_single = !in_single;
            out.push(c);
            i += 1;
            prev_boundary = Some(c);
            continue;
        }
        if c == '"' && !in_single {
            in_double = !in_double;
            out.push(c);
            i += 1;
            prev_boundary = Some(c);
            continue;
        }
        if in_single {
            out.push(c);
            i += 1;
            continue;
        }
        if c == '\\' && i + 1 < chars.len() && chars[i + 1] == '$' {
            out.push('\\');
            out.push('$');
            i += 2;
            prev_boundary = Some('$');
            continue;
        }
        if c == '~' && is_tilde_boundary(prev_boundary) {
            let (replacement, consumed) = expand_tilde(&chars, i, ctx);
            out.push_str(&replacement);
            i += consumed;
            prev_boundary = None;
            continue;
        }
        if c == '$' {
            if let Some((replacement, consumed)) = expand_dollar(&chars, i, ctx) {
                out.push_str(&replacement);
                i += consumed;
                prev_boundary = None;
                continue;
            }
        }
        prev_boundary = if c == ':' || c == '=' { Some(c) } else { None };
        out.push(c);
        i += 1;
    }

    if out.len() > VAR_EXPANSION_LIMIT {
        word.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ctx_with(pairs: &[(&str, &str)]) -> ExpansionContext {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExpansionContext::new(env)
    }

    #[test]
    fn expands_simple_var() {
        let ctx = ctx_with(&[("USER", "alice")]);
        assert_eq!(expand("Hello $USER", &ctx), "Hello alice");
    }

    #[test]
    fn braced_default_used_when_missing() {
        let ctx = ctx_with(&[]);
        assert_eq!(expand("${MISSING:-def}", &ctx), "def");
    }

    #[test]
    fn exit_code_special_var() {
        let mut ctx = ctx_with(&[]);
        ctx.last_exit_code = 42;
        assert_eq!(expand("Exit: $?", &ctx), "Exit: 42");
    }

    #[test]
    fn unresolved_var_is_empty() {
        let ctx = ctx_with(&[]);
        assert_eq!(expand("[$NOPE]", &ctx), "[]");
    }

    #[test]
    fn single_quotes_suppress_all_expansion() {
        let ctx = ctx_with(&[("USER", "alice")]);
        assert_eq!(expand("'$USER'", &ctx), "'$USER'");
    }

    #[test]
    fn tilde_expands_home_at_start() {
        let ctx = ctx_with(&[("HOME", "/home/alice")]);
        assert_eq!(expand("~/docs", &ctx), "/home/alice/docs");
    }

    #[test]
    fn tilde_mid_word_is_literal() {
        let ctx = ctx_with(&[("HOME", "/home/alice")]);
        assert_eq!(expand("a~b", &ctx), "a~b");
    }

    #[test]
    fn tilde_after_colon_expands() {
        let ctx = ctx_with(&[("HOME", "/home/alice")]);
        assert_eq!(expand("PATH=/usr/bin:~/bin", &ctx), "PATH=/usr/bin:/home/alice/bin");
    }

    #[test]
    fn unknown_user_tilde_falls_back_to_literal() {
        let ctx = ctx_with(&[]);
        assert_eq!(expand("~nobody/x", &ctx), "~nobody/x");
    }

    #[test]
    fn positional_params() {
        let mut ctx = ctx_with(&[]);
        ctx.positional = vec!["sh".into(), "a".into(), "b".into()];
        assert_eq!(expand("$0 $1 $2 $#", &ctx), "sh a b 2");
    }

    #[test]
    fn backslash_before_dollar_is_kept() {
        let ctx = ctx_with(&[("USER", "alice")]);
        assert_eq!(expand("\\$USER", &ctx), "\\$USER");
    }

    #[test]
    fn plain_text_is_idempotent() {
        let ctx = ctx_with(&[]);
        assert_eq!(expand("just plain text 123", &ctx), "just plain text 123");
    }
}
