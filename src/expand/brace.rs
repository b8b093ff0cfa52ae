//! L3: brace expansion — `{m..n[..s]}`, `{c..d[..s]}`, `{a,b,c}` with
//! nesting, zero-pad detection.
//!
//! No teacher analog; implemented as the work-queue-of-strings design
//! spec.md §9 recommends: pop a string, expand its first expandable brace
//! group, push the results back, stop when nothing contains one.

use crate::limits::{BRACE_CHAR_LIMIT, BRACE_NUMERIC_LIMIT};

enum BraceContent {
    Sequence(Vec<String>),
    List(Vec<String>),
}

/// Finds the first top-level, *expandable* brace pair in `s`: `(prefix,
/// body, suffix)`. Braces that parse as neither a sequence nor a
/// comma-list are left as literal text and scanning continues past them.
fn find_expandable_group(s: &str) -> Option<(String, String, String)> {
    let chars: Vec<char> = s.chars().collect();
    let mut search_from = 0;
    while search_from < chars.len() {
        let open = chars[search_from..].iter().position(|&c| c == '{')? + search_from;
        let mut depth = 1;
        let mut close = open + 1;
        while close < chars.len() && depth > 0 {
            match chars[close] {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                break;
            }
            close += 1;
        }
        if depth != 0 {
            // Unbalanced from here on; nothing left to expand.
            return None;
        }
        let body: String = chars[open + 1..close].iter().collect();
        if classify(&body).is_some() {
            let prefix: String = chars[..open].iter().collect();
            let suffix: String = chars[close + 1..].iter().collect();
            return Some((prefix, body, suffix));
        }
        search_from = close + 1;
    }
    None
}

fn classify(body: &str) -> Option<BraceContent> {
    if !body.contains('{') {
        if let Some(seq) = try_parse_sequence(body) {
            return Some(BraceContent::Sequence(seq));
        }
    }
    let items = split_top_level(body, ',');
    if items.len() > 1 {
        return Some(BraceContent::List(
            items.into_iter().map(|s| s.to_string()).collect(),
        ));
    }
    None
}

/// Splits `body` on `sep` at brace-nesting depth 0.
fn split_top_level(body: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&body[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn try_parse_sequence(body: &str) -> Option<Vec<String>> {
    if !body.contains("..") {
        return None;
    }
    let segments: Vec<&str> = body.split("..").collect();
    if segments.len() < 2 || segments.len() > 3 {
        return None;
    }
    let (raw_start, raw_end) = (segments[0], segments[1]);
    let raw_step = segments.get(2).copied();

    if let (Ok(start), Ok(end)) = (raw_start.parse::<i64>(), raw_end.parse::<i64>()) {
        let step = raw_step.and_then(|s| s.parse::<i64>().ok());
        return numeric_sequence(start, end, step, raw_start, raw_end);
    }

    let start_chars: Vec<char> = raw_start.chars().collect();
    let end_chars: Vec<char> = raw_end.chars().collect();
    if start_chars.len() == 1 && end_chars.len() == 1 {
        let step = raw_step.and_then(|s| s.parse::<i64>().ok());
        return char_sequence(start_chars[0], end_chars[0], step);
    }

    None
}

fn numeric_sequence(
    start: i64,
    end: i64,
    step: Option<i64>,
    raw_start: &str,
    raw_end: &str,
) -> Option<Vec<String>> {
    let direction: i64 = if end >= start { 1 } else { -1 };
    let step_abs = step.map(i64::abs).unwrap_or(1).max(1);
    let effective_step = step_abs * direction;

    let count = ((end - start) / effective_step).unsigned_abs() as usize + 1;
    if count > BRACE_NUMERIC_LIMIT {
        return None;
    }

    let pad = should_zero_pad(raw_start) || should_zero_pad(raw_end);
    let width = if pad {
        digit_width(raw_start).max(digit_width(raw_end))
    } else {
        0
    };

    let mut out = Vec::with_capacity(count);
    let mut v = start;
    for _ in 0..count {
        out.push(format_number(v, pad, width));
        v += effective_step;
    }
    Some(out)
}

fn should_zero_pad(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    digits.len() > 1 && digits.starts_with('0')
}

fn digit_width(raw: &str) -> usize {
    raw.strip_prefix('-').unwrap_or(raw).len()
}

fn format_number(v: i64, pad: bool, width: usize) -> String {
    if !pad {
        return v.to_string();
    }
    let neg = v < 0;
    let digits = v.unsigned_abs().to_string();
    let padded = format!("{digits:0>width$}");
    if neg {
        format!("-{padded}")
    } else {
        padded
    }
}

fn char_sequence(start: char, end: char, step: Option<i64>) -> Option<Vec<String>> {
    let start_u = start as u32;
    let end_u = end as u32;
    let direction: i32 = if end_u >= start_u { 1 } else { -1 };
    let step_abs = step.map(|s| s.unsigned_abs() as i32).unwrap_or(1).max(1);
    let effective_step = step_abs * direction;

    let count = (((end_u as i64 - start_u as i64) / effective_step as i64).unsigned_abs() as usize) + 1;
    if count > BRACE_CHAR_LIMIT {
        return None;
    }

    let mut out = Vec::with_capacity(count);
    let mut v = start_u as i32;
    for _ in 0..count {
        let c = char::from_u32(v as u32)?;
        out.push(c.to_string());
        v += effective_step;
    }
    Some(out)
}

/// Expands braces in `s`. Returns `[s]` unchanged if `s` contains no
/// expandable `{...}`.
pub fn expand(s: &str) -> Vec<String> {
    match find_expandable_group(s) {
        None => vec![s.to_string()],
        Some((prefix, body, suffix)) => {
            let content = classify(&body).expect("find_expandable_group only returns valid groups");
            let items = match content {
                BraceContent::Sequence(items) => items,
                BraceContent::List(items) => items,
            };
            let mut out = Vec::new();
            for item in items {
                let combined = format!("{prefix}{item}{suffix}");
                out.extend(expand(&combined));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_nonbrace_input_is_singleton() {
        assert_eq!(expand("plain"), vec!["plain".to_string()]);
    }

    #[test]
    fn comma_list() {
        assert_eq!(expand("{a,b,c}"), vec!["a", "b", "c"]);
    }

    #[test]
    fn prefix_suffix_sequence() {
        assert_eq!(
            expand("file{1..3}.txt"),
            vec!["file1.txt", "file2.txt", "file3.txt"]
        );
    }

    #[test]
    fn zero_padded_sequence_preserves_width() {
        let result = expand("{01..12}");
        assert_eq!(result[9], "10");
        assert_eq!(result[0], "01");
    }

    #[test]
    fn nested_list() {
        assert_eq!(expand("{a,b{1,2},c}"), vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn descending_sequence() {
        assert_eq!(expand("{3..1}"), vec!["3", "2", "1"]);
    }

    #[test]
    fn stepped_sequence() {
        assert_eq!(expand("{0..10..5}"), vec!["0", "5", "10"]);
    }

    #[test]
    fn char_sequence_range() {
        assert_eq!(expand("{a..e}"), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn negative_numbers_pad_after_sign() {
        let result = expand("{-05..-03}");
        assert_eq!(result, vec!["-05", "-04", "-03"]);
    }

    #[test]
    fn over_limit_sequence_is_literal() {
        assert_eq!(expand("{1..5000}"), vec!["{1..5000}".to_string()]);
    }

    #[test]
    fn malformed_braces_are_literal() {
        assert_eq!(expand("{notasequence}"), vec!["{notasequence}".to_string()]);
    }
}
