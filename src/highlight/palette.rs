//! L4: named-role color mapping for the syntax highlighter.
//!
//! Grounded on the teacher's `Theme` struct (`ui/theme.rs`): one named
//! field per UI role, with constructor functions for presets. Here the
//! roles are shell-syntax categories instead of panel/dialog widgets, and
//! colors are basic SGR indices (the highlighter targets a plain ANSI
//! terminal, not a `ratatui` backend) rather than `ratatui::style::Color`.

use crate::terminal::AnsiBuilder;

use super::tokenize::TokenKind;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub command: u8,
    pub flag: u8,
    pub variable: u8,
    pub string: u8,
    pub comment: u8,
}

impl Palette {
    /// The default palette: green commands, cyan flags, magenta
    /// variables, yellow strings, gray comments.
    pub fn classic() -> Self {
        Self {
            command: 2,
            flag: 6,
            variable: 5,
            string: 3,
            comment: 7,
        }
    }

    fn color_for(&self, kind: TokenKind) -> Option<u8> {
        match kind {
            TokenKind::Command => Some(self.command),
            TokenKind::Flag => Some(self.flag),
            TokenKind::Variable => Some(self.variable),
            TokenKind::StringLit => Some(self.string),
            TokenKind::Comment => Some(self.comment),
            TokenKind::Plain => None,
        }
    }

    /// Applies the SGR for `kind` to `ansi`, if that role carries a color.
    pub fn apply(&self, ansi: &mut AnsiBuilder, kind: TokenKind) {
        if let Some(color) = self.color_for(kind) {
            ansi.fg_basic(color, false);
        }
    }

    /// Applies the error override: underlined bright red, taking priority
    /// over the token's normal color (spec.md §4.8).
    pub fn apply_error(&self, ansi: &mut AnsiBuilder) {
        ansi.fg_basic(1, true);
        ansi.underline(true);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}
