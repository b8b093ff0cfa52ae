//! Growable ANSI/CSI byte builder.
//!
//! Owns no terminal state — it only assembles bytes the caller writes. All
//! sequences are `ESC [ ...` (CSI) or `ESC ] ...` as listed in spec.md §6.

const ESC: u8 = 0x1b;

#[derive(Debug, Default, Clone)]
pub struct AnsiBuilder {
    buf: Vec<u8>,
}

impl AnsiBuilder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn csi(&mut self, body: &str, final_byte: char) -> &mut Self {
        self.buf.push(ESC);
        self.buf.push(b'[');
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.push(final_byte as u8);
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.csi("0", 'm')
    }

    pub fn bold(&mut self, on: bool) -> &mut Self {
        if on {
            self.csi("1", 'm')
        } else {
            self.csi("22", 'm')
        }
    }

    /// Basic foreground color, 0..=7 (8..=15 for bright via `bright`).
    pub fn fg_basic(&mut self, n: u8, bright: bool) -> &mut Self {
        let code = if bright { 90 + n } else { 30 + n };
        self.csi(&code.to_string(), 'm')
    }

    pub fn bg_basic(&mut self, n: u8, bright: bool) -> &mut Self {
        let code = if bright { 100 + n } else { 40 + n };
        self.csi(&code.to_string(), 'm')
    }

    pub fn fg_256(&mut self, n: u8) -> &mut Self {
        self.csi(&format!("38;5;{n}"), 'm')
    }

    pub fn bg_256(&mut self, n: u8) -> &mut Self {
        self.csi(&format!("48;5;{n}"), 'm')
    }

    pub fn fg_rgb(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.csi(&format!("38;2;{r};{g};{b}"), 'm')
    }

    pub fn bg_rgb(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.csi(&format!("48;2;{r};{g};{b}"), 'm')
    }

    pub fn underline(&mut self, on: bool) -> &mut Self {
        if on {
            self.csi("4", 'm')
        } else {
            self.csi("24", 'm')
        }
    }

    pub fn cursor_up(&mut self, n: u16) -> &mut Self {
        self.csi(&n.to_string(), 'A')
    }

    pub fn cursor_down(&mut self, n: u16) -> &mut Self {
        self.csi(&n.to_string(), 'B')
    }

    pub fn cursor_forward(&mut self, n: u16) -> &mut Self {
        self.csi(&n.to_string(), 'C')
    }

    pub fn cursor_back(&mut self, n: u16) -> &mut Self {
        self.csi(&n.to_string(), 'D')
    }

    /// 1-indexed row/col.
    pub fn cursor_to(&mut self, row: u16, col: u16) -> &mut Self {
        self.csi(&format!("{row};{col}"), 'H')
    }

    pub fn save_cursor(&mut self) -> &mut Self {
        self.csi("", 's')
    }

    pub fn restore_cursor(&mut self) -> &mut Self {
        self.csi("", 'u')
    }

    pub fn erase_screen_all(&mut self) -> &mut Self {
        self.csi("2", 'J')
    }

    pub fn erase_screen_below(&mut self) -> &mut Self {
        self.csi("0", 'J')
    }

    pub fn erase_screen_above(&mut self) -> &mut Self {
        self.csi("1", 'J')
    }

    pub fn erase_line_all(&mut self) -> &mut Self {
        self.csi("2", 'K')
    }

    pub fn erase_line_right(&mut self) -> &mut Self {
        self.csi("0", 'K')
    }

    pub fn erase_line_left(&mut self) -> &mut Self {
        self.csi("1", 'K')
    }

    pub fn hide_cursor(&mut self) -> &mut Self {
        self.csi("?25", 'l')
    }

    pub fn show_cursor(&mut self) -> &mut Self {
        self.csi("?25", 'h')
    }

    pub fn alt_screen(&mut self, on: bool) -> &mut Self {
        if on {
            self.csi("?1049", 'h')
        } else {
            self.csi("?1049", 'l')
        }
    }

    pub fn mouse_tracking(&mut self, on: bool) -> &mut Self {
        if on {
            self.csi("?1000", 'h')
        } else {
            self.csi("?1000", 'l')
        }
    }

    pub fn query_cursor_position(&mut self) -> &mut Self {
        self.csi("6", 'n')
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_emits_csi_0m() {
        let mut b = AnsiBuilder::new();
        b.reset();
        assert_eq!(b.into_bytes(), b"\x1b[0m");
    }

    #[test]
    fn fg_256_formats_index() {
        let mut b = AnsiBuilder::new();
        b.fg_256(200);
        assert_eq!(b.into_bytes(), b"\x1b[38;5;200m");
    }

    #[test]
    fn cursor_to_uses_row_col_order() {
        let mut b = AnsiBuilder::new();
        b.cursor_to(3, 10);
        assert_eq!(b.into_bytes(), b"\x1b[3;10H");
    }

    #[test]
    fn builder_chains_multiple_sequences() {
        let mut b = AnsiBuilder::new();
        b.bold(true).fg_basic(1, false).reset();
        assert_eq!(b.into_bytes(), b"\x1b[1m\x1b[31m\x1b[0m");
    }
}
