//! L4: syntax highlighter + error detector. Runs purely for display,
//! against the live edit buffer contents (spec.md §4.8).

pub mod diagnostics;
pub mod palette;
pub mod tokenize;

pub use diagnostics::{detect, Diagnostic};
pub use palette::Palette;
pub use tokenize::{tokenize, Token, TokenKind};

use std::collections::BTreeSet;

use crate::terminal::AnsiBuilder;

/// Colorizes `line` per `palette`, with no error overlay.
pub fn highlight(line: &str, palette: &Palette) -> Vec<u8> {
    render(line, palette, &[])
}

/// Colorizes `line` and overlays the underlined-red error style on any
/// byte ranges the error detector flags, taking priority over the
/// regular token color.
pub fn highlight_with_errors(line: &str, palette: &Palette) -> (Vec<u8>, Vec<Diagnostic>) {
    let diags = detect(line);
    let bytes = render(line, palette, &diags);
    (bytes, diags)
}

fn render(line: &str, palette: &Palette, diagnostics: &[Diagnostic]) -> Vec<u8> {
    let tokens = tokenize(line);

    let mut boundaries = BTreeSet::new();
    boundaries.insert(0);
    boundaries.insert(line.len());
    for t in &tokens {
        boundaries.insert(t.start);
        boundaries.insert(t.end);
    }
    for d in diagnostics {
        boundaries.insert(d.position);
        boundaries.insert((d.position + d.length).min(line.len()));
    }
    let bounds: Vec<usize> = boundaries.into_iter().collect();

    let mut out = AnsiBuilder::new();
    for w in bounds.windows(2) {
        let (start, end) = (w[0], w[1]);
        if start >= end {
            continue;
        }
        let is_error = diagnostics
            .iter()
            .any(|d| start >= d.position && start < d.position + d.length);
        let token_kind = tokens
            .iter()
            .find(|t| start >= t.start && start < t.end)
            .map(|t| t.kind);

        let colored = if is_error {
            palette.apply_error(&mut out);
            true
        } else if let Some(kind) = token_kind {
            palette.apply(&mut out, kind);
            true
        } else {
            false
        };

        out.raw(line[start..end].as_bytes());
        if colored {
            out.reset();
        }
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_has_no_escape_bytes() {
        let palette = Palette::classic();
        let out = highlight("plain text here", &palette);
        assert!(!out.contains(&0x1b));
    }

    #[test]
    fn command_word_gets_colored() {
        let palette = Palette::classic();
        let out = highlight("echo hi", &palette);
        assert!(out.contains(&0x1b));
    }

    #[test]
    fn error_overlay_wins_over_token_color() {
        let palette = Palette::classic();
        let (out, diags) = highlight_with_errors("(echo hi", &palette);
        assert_eq!(diags.len(), 1);
        // Error style uses bright red (fg code 91) somewhere in the output.
        let s = String::from_utf8_lossy(&out);
        assert!(s.contains("\x1b[91m"));
    }
}
