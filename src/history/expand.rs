//! L3: history expansion (`!!`, `!N`, `!-k`, `!str`, `!?str?`, `!$`, `!*`,
//! `!#`, word designators, `^old^new`).
//!
//! No teacher analog (the teacher's embedded shell is pure up/down replay);
//! grounded directly on the operator table in spec.md §4.4.

use super::ring::HistoryRing;

/// Splits a command line into words, treating single- and double-quoted
/// spans as atomic units. Quote characters are kept as part of the word so
/// that designator selection reproduces the original text verbatim.
pub fn split_words(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut words = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' => break,
                b'\'' => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != b'\'' {
                        i += 1;
                    }
                    if i < bytes.len() {
                        i += 1;
                    }
                }
                b'"' => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != b'"' {
                        i += 1;
                    }
                    if i < bytes.len() {
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
        words.push(&line[start..i]);
    }
    words
}

enum WordSel {
    Index(usize),
    Last,
    FirstArg,
    AllArgs,
    Range(usize, RangeEnd),
}

enum RangeEnd {
    Index(usize),
    Last,
}

fn select_words(words: &[&str], sel: &WordSel) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    let last_idx = words.len() - 1;
    match sel {
        WordSel::Index(n) => words.get(*n).map(|w| w.to_string()),
        WordSel::Last => Some(words[last_idx].to_string()),
        WordSel::FirstArg => words.get(1).map(|w| w.to_string()),
        WordSel::AllArgs => {
            if words.len() <= 1 {
                Some(String::new())
            } else {
                Some(words[1..].join(" "))
            }
        }
        WordSel::Range(start, end) => {
            let end_idx = match end {
                RangeEnd::Index(n) => *n,
                RangeEnd::Last => last_idx,
            };
            if *start > end_idx || *start > last_idx {
                return None;
            }
            let end_idx = end_idx.min(last_idx);
            Some(words[*start..=end_idx].join(" "))
        }
    }
}

/// Parses a `:designator` suffix starting at `chars[i]` (which must be `:`).
/// Returns the selector and the number of characters consumed.
fn parse_designator(chars: &[char], i: usize) -> Option<(WordSel, usize)> {
    debug_assert_eq!(chars[i], ':');
    let mut j = i + 1;
    if j >= chars.len() {
        return None;
    }
    match chars[j] {
        '$' => Some((WordSel::Last, j + 1 - i)),
        '^' => Some((WordSel::FirstArg, j + 1 - i)),
        '*' => Some((WordSel::AllArgs, j + 1 - i)),
        c if c.is_ascii_digit() => {
            let start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let first: usize = chars[start..j].iter().collect::<String>().parse().ok()?;
            if j < chars.len() && chars[j] == '-' {
                let dash = j;
                j += 1;
                if j < chars.len() && chars[j] == '$' {
                    return Some((WordSel::Range(first, RangeEnd::Last), j + 1 - i));
                }
                let range_start = j;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
                if j == range_start {
                    // No digits after '-': not a valid range, back off to
                    // treating this as just `:N`.
                    return Some((WordSel::Index(first), dash - i));
                }
                let second: usize = chars[range_start..j].iter().collect::<String>().parse().ok()?;
                return Some((WordSel::Range(first, RangeEnd::Index(second)), j - i));
            }
            Some((WordSel::Index(first), j - i))
        }
        _ => None,
    }
}

fn apply_designator(resolved: &str, chars: &[char], i: usize) -> (String, usize) {
    if i < chars.len() && chars[i] == ':' {
        if let Some((sel, consumed)) = parse_designator(chars, i) {
            let words = split_words(resolved);
            if let Some(text) = select_words(&words, &sel) {
                return (text, consumed);
            }
        }
    }
    (resolved.to_string(), 0)
}

/// Result of expanding one `!`-designator occurrence.
struct BangMatch {
    replacement: String,
    consumed: usize,
}

fn match_bang(
    chars: &[char],
    i: usize,
    ring: &HistoryRing,
    current_partial: Option<&str>,
) -> Option<BangMatch> {
    debug_assert_eq!(chars[i], '!');
    let mut j = i + 1;
    if j >= chars.len() {
        return None;
    }
    match chars[j] {
        '!' => {
            let entry = ring.get_from_newest(1)?;
            let (text, consumed) = apply_designator(&entry.text, chars, j + 1);
            Some(BangMatch {
                replacement: text,
                consumed: (j + 1 - i) + consumed,
            })
        }
        '$' => {
            let entry = ring.get_from_newest(1)?;
            let words = split_words(&entry.text);
            let text = select_words(&words, &WordSel::Last)?;
            Some(BangMatch {
                replacement: text,
                consumed: j + 1 - i,
            })
        }
        '*' => {
            let entry = ring.get_from_newest(1)?;
            let words = split_words(&entry.text);
            let text = select_words(&words, &WordSel::AllArgs).unwrap_or_default();
            Some(BangMatch {
                replacement: text,
                consumed: j + 1 - i,
            })
        }
        '#' => Some(BangMatch {
            replacement: current_partial.unwrap_or("").to_string(),
            consumed: j + 1 - i,
        }),
        '-' => {
            let start = j + 1;
            let mut k = start;
            while k < chars.len() && chars[k].is_ascii_digit() {
                k += 1;
            }
            if k == start {
                return None;
            }
            let num: usize = chars[start..k].iter().collect::<String>().parse().ok()?;
            let entry = ring.get_from_newest(num)?;
            let (text, consumed) = apply_designator(&entry.text, chars, k);
            Some(BangMatch {
                replacement: text,
                consumed: (k - i) + consumed,
            })
        }
        '?' => {
            let start = j + 1;
            let mut k = start;
            while k < chars.len() && chars[k] != '?' {
                k += 1;
            }
            let needle: String = chars[start..k].iter().collect();
            let end = if k < chars.len() { k + 1 } else { k };
            let entry = ring.find_contains(&needle)?;
            let (text, consumed) = apply_designator(&entry.text, chars, end);
            Some(BangMatch {
                replacement: text,
                consumed: (end - i) + consumed,
            })
        }
        c if c.is_ascii_digit() => {
            let start = j;
            let mut k = start;
            while k < chars.len() && chars[k].is_ascii_digit() {
                k += 1;
            }
            let num: u64 = chars[start..k].iter().collect::<String>().parse().ok()?;
            let entry = ring.get_by_number(num)?;
            let (text, consumed) = apply_designator(&entry.text, chars, k);
            Some(BangMatch {
                replacement: text,
                consumed: (k - i) + consumed,
            })
        }
        c if is_word_char(c) => {
            let start = j;
            let mut k = start;
            while k < chars.len() && is_word_char(chars[k]) {
                k += 1;
            }
            let prefix: String = chars[start..k].iter().collect();
            let entry = ring.find_prefix(&prefix)?;
            let (text, consumed) = apply_designator(&entry.text, chars, k);
            Some(BangMatch {
                replacement: text,
                consumed: (k - i) + consumed,
            })
        }
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '/' || c == '-'
}

/// Handles the `^old^new[^]` quick-substitution form applied to the most
/// recent command. Returns `None` if the line isn't of that shape.
fn try_quick_substitution(line: &str, ring: &HistoryRing) -> Option<(String, bool)> {
    if !line.starts_with('^') {
        return None;
    }
    let rest = &line[1..];
    let mut parts = rest.splitn(2, '^');
    let old = parts.next()?;
    let after_old = parts.next()?;
    let new = after_old.strip_suffix('^').unwrap_or(after_old);
    let entry = ring.get_from_newest(1)?;
    if !entry.text.contains(old) {
        return Some((line.to_string(), false));
    }
    Some((entry.text.replacen(old, new, 1), true))
}

/// Expands all history designators in `line`. Returns the expanded text and
/// whether any expansion actually occurred.
///
/// Expansion is suppressed inside single quotes; double quotes do not
/// suppress it. A backslash immediately before `!` suppresses one
/// occurrence and is consumed.
pub fn expand_history(
    line: &str,
    ring: &HistoryRing,
    current_partial: Option<&str>,
) -> (String, bool) {
    if let Some(result) = try_quick_substitution(line, ring) {
        return result;
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut occurred = false;
    let mut in_single = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() && chars[i + 1] == '!' {
            out.push('!');
            i += 2;
            continue;
        }
        if c == '\'' {
            in_single = !in_single;
            out.push(c);
            i += 1;
            continue;
        }
        if c == '!' && !in_single {
            if let Some(m) = match_bang(&chars, i, ring, current_partial) {
                out.push_str(&m.replacement);
                occurred = true;
                i += m.consumed;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    (out, occurred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_with(cmds: &[&str]) -> HistoryRing {
        let mut r = HistoryRing::new(100);
        for c in cmds {
            r.push(c);
        }
        r
    }

    #[test]
    fn bang_bang_is_previous_command() {
        let ring = ring_with(&["echo hello", "ls -la"]);
        assert_eq!(expand_history("!!", &ring, None).0, "ls -la");
    }

    #[test]
    fn bang_minus_two() {
        let ring = ring_with(&["echo hello", "ls -la"]);
        assert_eq!(expand_history("!-2", &ring, None).0, "echo hello");
    }

    #[test]
    fn bang_number_one() {
        let ring = ring_with(&["echo hello", "ls -la"]);
        assert_eq!(expand_history("!1", &ring, None).0, "echo hello");
    }

    #[test]
    fn bang_prefix_match() {
        let ring = ring_with(&["echo hello", "ls -la"]);
        assert_eq!(expand_history("!echo", &ring, None).0, "echo hello");
    }

    #[test]
    fn bang_question_contains() {
        let ring = ring_with(&["echo hello", "ls -la"]);
        assert_eq!(expand_history("!?la?", &ring, None).0, "ls -la");
    }

    #[test]
    fn quick_substitution() {
        let ring = ring_with(&["echo hello"]);
        assert_eq!(expand_history("^hello^world", &ring, None).0, "echo world");
    }

    #[test]
    fn single_quotes_suppress_expansion() {
        let ring = ring_with(&["echo hello"]);
        let (out, occurred) = expand_history("echo '!!'", &ring, None);
        assert_eq!(out, "echo '!!'");
        assert!(!occurred);
    }

    #[test]
    fn double_quotes_do_not_suppress() {
        let ring = ring_with(&["ls -la"]);
        let (out, occurred) = expand_history("echo \"!!\"", &ring, None);
        assert_eq!(out, "echo \"ls -la\"");
        assert!(occurred);
    }

    #[test]
    fn backslash_suppresses_one_occurrence() {
        let ring = ring_with(&["ls -la"]);
        let (out, occurred) = expand_history("echo \\!!", &ring, None);
        assert_eq!(out, "echo !!");
        assert!(!occurred);
    }

    #[test]
    fn last_word_designator() {
        let ring = ring_with(&["cp a.txt b.txt"]);
        assert_eq!(expand_history("!$", &ring, None).0, "b.txt");
    }

    #[test]
    fn all_args_designator() {
        let ring = ring_with(&["cp a.txt b.txt"]);
        assert_eq!(expand_history("!*", &ring, None).0, "a.txt b.txt");
    }

    #[test]
    fn word_index_designator() {
        let ring = ring_with(&["cp a.txt b.txt c.txt"]);
        assert_eq!(expand_history("!!:2", &ring, None).0, "b.txt");
    }

    #[test]
    fn word_range_designator() {
        let ring = ring_with(&["cp a.txt b.txt c.txt"]);
        assert_eq!(expand_history("!!:1-2", &ring, None).0, "a.txt b.txt");
        assert_eq!(expand_history("!!:1-$", &ring, None).0, "a.txt b.txt c.txt");
    }

    #[test]
    fn unresolved_reference_left_unchanged() {
        let ring = HistoryRing::new(10);
        let (out, occurred) = expand_history("!nope", &ring, None);
        assert_eq!(out, "!nope");
        assert!(!occurred);
    }

    #[test]
    fn current_partial_line_empty_when_not_supplied() {
        let ring = ring_with(&["ls"]);
        assert_eq!(expand_history("!#", &ring, None).0, "");
    }
}
