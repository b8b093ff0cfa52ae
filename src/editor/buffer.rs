//! L2: the in-progress edit buffer.
//!
//! A fixed-capacity byte array plus `cursor`/`length` indices maintaining
//! `0 <= cursor <= length <= capacity` (spec.md §3). Generalizes the
//! teacher's `TextField` helper (which works on a `String` + `usize`
//! cursor for dialog inputs) into a capacity-bounded buffer that treats
//! edits as byte operations, per the spec's explicit byte-array framing.
//! Deletion-by-word only recognizes ASCII space as a separator; wider
//! boundary handling is out of scope (spec.md §9).

use crate::limits::EDIT_BUFFER_CAPACITY;

#[derive(Debug)]
pub struct EditBuffer {
    bytes: Vec<u8>,
    cursor: usize,
    capacity: usize,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::with_capacity(EDIT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Replaces the whole buffer with `text` (truncated to capacity),
    /// cursor placed at the end. Used by history navigation.
    pub fn load(&mut self, text: &str) {
        self.bytes.clear();
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.truncate(self.capacity);
        self.cursor = self.bytes.len();
    }

    /// Inserts a single byte at the cursor. No-op once the buffer is full.
    pub fn insert(&mut self, b: u8) -> bool {
        if self.bytes.len() >= self.capacity {
            return false;
        }
        self.bytes.insert(self.cursor, b);
        self.cursor += 1;
        true
    }

    /// Deletes the byte left of the cursor (Backspace). Returns whether
    /// anything was deleted.
    pub fn delete_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.bytes.remove(self.cursor - 1);
        self.cursor -= 1;
        true
    }

    /// Deletes the byte at the cursor (Ctrl+D / Delete). Returns whether
    /// anything was deleted.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.bytes.len() {
            return false;
        }
        self.bytes.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.bytes.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.bytes.len();
    }

    /// Deletes from the cursor to end of buffer (Ctrl+K).
    pub fn kill_to_end(&mut self) {
        self.bytes.truncate(self.cursor);
    }

    /// Deletes from start of buffer to the cursor (Ctrl+U).
    pub fn kill_to_start(&mut self) {
        self.bytes.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Deletes the word left of the cursor (Ctrl+W): skip trailing spaces,
    /// then delete the non-space run before them.
    pub fn delete_word_left(&mut self) {
        let mut i = self.cursor;
        while i > 0 && self.bytes[i - 1] == b' ' {
            i -= 1;
        }
        while i > 0 && self.bytes[i - 1] != b' ' {
            i -= 1;
        }
        self.bytes.drain(i..self.cursor);
        self.cursor = i;
    }

    /// Splices `replacement` in place of `[start, end)`, moving the cursor
    /// to the end of the inserted text. Used for completion insertion.
    pub fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        self.bytes.splice(start..end, replacement.bytes());
        self.bytes.truncate(self.capacity);
        self.cursor = (start + replacement.len()).min(self.bytes.len());
    }

    /// Byte offset of the start of the word under/left of the cursor
    /// (everything up to and including the last `/`, or the last space,
    /// whichever is nearer), for completion.
    pub fn word_start(&self) -> usize {
        let mut i = self.cursor;
        while i > 0 && self.bytes[i - 1] != b' ' {
            i -= 1;
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_cursor_invariant() {
        let mut buf = EditBuffer::new();
        buf.insert(b'h');
        buf.insert(b'i');
        assert_eq!(buf.as_str(), "hi");
        assert_eq!(buf.cursor(), 2);
        assert!(buf.cursor() <= buf.len());
    }

    #[test]
    fn insert_past_capacity_is_rejected() {
        let mut buf = EditBuffer::with_capacity(2);
        assert!(buf.insert(b'a'));
        assert!(buf.insert(b'b'));
        assert!(!buf.insert(b'c'));
        assert_eq!(buf.as_str(), "ab");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buf = EditBuffer::new();
        assert!(!buf.delete_left());
    }

    #[test]
    fn delete_word_left_skips_trailing_spaces() {
        let mut buf = EditBuffer::new();
        buf.load("git commit  ");
        buf.delete_word_left();
        assert_eq!(buf.as_str(), "git ");
    }

    #[test]
    fn kill_to_end_truncates_from_cursor() {
        let mut buf = EditBuffer::new();
        buf.load("hello world");
        buf.move_home();
        for _ in 0..5 {
            buf.move_right();
        }
        buf.kill_to_end();
        assert_eq!(buf.as_str(), "hello");
    }

    #[test]
    fn kill_to_start_removes_prefix() {
        let mut buf = EditBuffer::new();
        buf.load("hello world");
        buf.move_home();
        for _ in 0..6 {
            buf.move_right();
        }
        buf.kill_to_start();
        assert_eq!(buf.as_str(), "world");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn splice_replaces_range_and_moves_cursor() {
        let mut buf = EditBuffer::new();
        buf.load("cd Doc");
        buf.splice(3, 6, "Documents/");
        assert_eq!(buf.as_str(), "cd Documents/");
        assert_eq!(buf.cursor(), 13);
    }

    #[test]
    fn load_truncates_to_capacity() {
        let mut buf = EditBuffer::with_capacity(4);
        buf.load("hello");
        assert_eq!(buf.as_str(), "hell");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn word_start_finds_last_space_boundary() {
        let mut buf = EditBuffer::new();
        buf.load("cd Doc");
        assert_eq!(buf.word_start(), 3);
    }
}
