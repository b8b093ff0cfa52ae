//! L4: syntax error detection over the raw edit-buffer text (spec.md
//! §4.8). Scans for unmatched quotes, unmatched brackets, and a trailing
//! `|`/`&` left dangling at end of line.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: usize,
    pub length: usize,
    pub message: String,
}

fn describe(c: char) -> &'static str {
    match c {
        '(' | ')' => "parenthesis",
        '[' | ']' => "bracket",
        '{' | '}' => "brace",
        _ => "delimiter",
    }
}

fn matching_open(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// Detects unmatched quotes/brackets and a trailing unescaped `|`/`&`.
pub fn detect(line: &str) -> Vec<Diagnostic> {
    let chars: Vec<char> = line.chars().collect();
    let mut diags = Vec::new();
    let mut stack: Vec<(usize, char)> = Vec::new();
    let mut quote: Option<(usize, char)> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some((_, qc)) = quote {
            if c == '\\' && qc == '"' && i + 1 < chars.len() {
                i += 2;
                continue;
            }
            if c == qc {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '\\' if i + 1 < chars.len() => {
                i += 2;
                continue;
            }
            '\'' | '"' => quote = Some((i, c)),
            '(' | '[' | '{' => stack.push((i, c)),
            ')' | ']' | '}' => {
                let expected = matching_open(c);
                match stack.last() {
                    Some(&(_, oc)) if oc == expected => {
                        stack.pop();
                    }
                    _ => {
                        diags.push(Diagnostic {
                            position: i,
                            length: 1,
                            message: format!("unmatched closing {}", describe(c)),
                        });
                    }
                }
            }
            '#' => break,
            _ => {}
        }
        i += 1;
    }

    if let Some((pos, qc)) = quote {
        let name = if qc == '\'' { "single" } else { "double" };
        diags.push(Diagnostic {
            position: pos,
            length: 1,
            message: format!("unmatched {name} quote"),
        });
    }

    for (pos, oc) in stack {
        diags.push(Diagnostic {
            position: pos,
            length: 1,
            message: format!("unmatched opening {}", describe(oc)),
        });
    }

    let trimmed = line.trim_end();
    if let Some(last) = trimmed.chars().last() {
        if (last == '|' || last == '&') && quote.is_none() {
            let escaped = trimmed
                .char_indices()
                .rev()
                .nth(1)
                .is_some_and(|(_, c)| c == '\\');
            if !escaped {
                diags.push(Diagnostic {
                    position: trimmed.chars().count() - 1,
                    length: 1,
                    message: "incomplete command after operator".to_string(),
                });
            }
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_single_quote_reports_opening_position() {
        let diags = detect("echo 'hello");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].position, 5);
        assert_eq!(diags[0].message, "unmatched single quote");
    }

    #[test]
    fn unmatched_open_paren_reports_position_zero() {
        let diags = detect("(echo hello");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].position, 0);
        assert_eq!(diags[0].message, "unmatched opening parenthesis");
    }

    #[test]
    fn trailing_pipe_is_incomplete_command() {
        let diags = detect("echo hello |");
        assert!(diags.iter().any(|d| d.message == "incomplete command after operator"));
    }

    #[test]
    fn balanced_line_has_no_diagnostics() {
        assert!(detect("echo 'hello' (world)").is_empty());
    }

    #[test]
    fn comment_suppresses_further_scanning() {
        assert!(detect("echo hi # unmatched ( here").is_empty());
    }

    #[test]
    fn orphan_closing_bracket_is_reported() {
        let diags = detect("echo hello)");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].position, 10);
    }
}
