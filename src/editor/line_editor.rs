//! L2: the interactive line editor — `read_line`, key dispatch, history
//! navigation, completion cycling, and redraw (spec.md §4.3).
//!
//! No direct teacher analog: the teacher's embedded shell hands raw bytes
//! straight through to a child PTY and never edits a line itself. This
//! builds the editor the spec calls for on top of the terminal substrate
//! the teacher already uses that way (raw termios + timed read), combined
//! with the byte-editing primitives generalized from `TextField`.

use std::io;
use std::thread;
use std::time::Duration;

use crate::error::{Result, ShellCoreError};
use crate::history::HistoryRing;
use crate::io_buf::{ByteReader, LineWriter};
use crate::terminal::{self, AnsiBuilder, Terminal};

use super::buffer::EditBuffer;
use super::completion::{self, CompletionState, TabOutcome};

/// A decoded input event, independent of how many raw bytes it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    CtrlC,
    CtrlD,
    CtrlA,
    CtrlE,
    CtrlB,
    CtrlF,
    CtrlK,
    CtrlU,
    CtrlW,
    Tab,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    Home,
    End,
    PageUp,
    PageDown,
    Printable(u8),
}

/// Decodes a single non-escape byte. Returns `None` for the `ESC` byte
/// itself (0x1b), which starts an escape sequence instead, and for bytes
/// outside the recognized control/printable ranges.
pub fn decode_byte(b: u8) -> Option<Key> {
    match b {
        b'\r' | b'\n' => Some(Key::Enter),
        0x03 => Some(Key::CtrlC),
        0x04 => Some(Key::CtrlD),
        0x01 => Some(Key::CtrlA),
        0x05 => Some(Key::CtrlE),
        0x02 => Some(Key::CtrlB),
        0x06 => Some(Key::CtrlF),
        0x0b => Some(Key::CtrlK),
        0x15 => Some(Key::CtrlU),
        0x17 => Some(Key::CtrlW),
        b'\t' => Some(Key::Tab),
        0x7f | 0x08 => Some(Key::Backspace),
        0x20..=0x7e => Some(Key::Printable(b)),
        _ => None,
    }
}

/// Outcome of feeding one more byte to an in-progress escape sequence.
pub enum EscapeDecode {
    Complete(Key),
    Incomplete,
    Invalid,
}

/// Parses the bytes following `ESC` (not including `ESC` itself).
/// `buf[0]` must be `[` — every sequence this editor recognizes is CSI.
pub fn decode_escape(buf: &[u8]) -> EscapeDecode {
    if buf.is_empty() {
        return EscapeDecode::Incomplete;
    }
    if buf[0] != b'[' {
        return EscapeDecode::Invalid;
    }
    if buf.len() == 1 {
        return EscapeDecode::Incomplete;
    }
    match buf[1] {
        b'A' => EscapeDecode::Complete(Key::ArrowUp),
        b'B' => EscapeDecode::Complete(Key::ArrowDown),
        b'C' => EscapeDecode::Complete(Key::ArrowRight),
        b'D' => EscapeDecode::Complete(Key::ArrowLeft),
        b'H' => EscapeDecode::Complete(Key::Home),
        b'F' => EscapeDecode::Complete(Key::End),
        b'3' | b'5' | b'6' => {
            if buf.len() == 2 {
                EscapeDecode::Incomplete
            } else if buf[2] == b'~' {
                let key = match buf[1] {
                    b'3' => Key::Delete,
                    b'5' => Key::PageUp,
                    _ => Key::PageDown,
                };
                EscapeDecode::Complete(key)
            } else {
                EscapeDecode::Invalid
            }
        }
        _ => EscapeDecode::Invalid,
    }
}

/// Max bytes accumulated for one in-progress escape sequence before it's
/// abandoned as unparseable.
const MAX_ESCAPE_LEN: usize = 8;

/// Candidate-listing/completion callback: `(typed_basename, line_upto_cursor)
/// -> basenames`.
pub type CompletionFn<'a> = dyn Fn(&str, &str) -> Vec<String> + 'a;

pub struct LineEditor<'a> {
    term: Terminal,
    reader: ByteReader<io::Stdin>,
    writer: LineWriter<io::Stdout>,
    completion: Option<Box<CompletionFn<'a>>>,
}

impl<'a> Default for LineEditor<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LineEditor<'a> {
    pub fn new() -> Self {
        Self {
            term: Terminal::new(),
            reader: ByteReader::new(io::stdin()),
            writer: LineWriter::new(io::stdout()),
            completion: None,
        }
    }

    pub fn set_completion_callback<F>(&mut self, cb: F)
    where
        F: Fn(&str, &str) -> Vec<String> + 'a,
    {
        self.completion = Some(Box::new(cb));
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn display_candidates(&mut self, candidates: &[String]) -> Result<()> {
        let mut ansi = AnsiBuilder::new();
        ansi.save_cursor();
        self.writer.write_all(&ansi.into_bytes())?;
        self.writer.write_all(b"\r\n")?;
        self.writer.write_all(candidates.join("  ").as_bytes())?;
        let mut restore = AnsiBuilder::new();
        restore.restore_cursor();
        self.writer.write_all(&restore.into_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Rewrites the line from just after the prompt to the end of the
    /// buffer, erases anything stale past it, and puts the cursor back
    /// where the buffer says it belongs.
    fn redraw(&mut self, prompt_len: usize, buf: &EditBuffer) -> Result<()> {
        let mut ansi = AnsiBuilder::new();
        ansi.raw(b"\r");
        if prompt_len > 0 {
            ansi.cursor_forward(prompt_len as u16);
        }
        ansi.raw(buf.as_str().as_bytes());
        ansi.erase_line_right();
        let tail = buf.len() - buf.cursor();
        if tail > 0 {
            ansi.cursor_back(tail as u16);
        }
        self.writer.write_all(&ansi.into_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads one full line interactively. Returns `Ok(None)` on EOF
    /// (Ctrl+D on an empty buffer), `Err(Interrupted)` on Ctrl+C. The
    /// terminal is always restored to its prior mode before returning,
    /// on every exit path.
    pub fn read_line(&mut self, prompt: &str, history: &HistoryRing) -> Result<Option<String>> {
        self.write(prompt.as_bytes())?;
        let prompt_len = prompt.chars().count();

        match self.term.enable_raw() {
            Ok(()) => {}
            Err(ShellCoreError::TerminalNotAvailable) => return self.read_line_cooked(),
            Err(e) => return Err(e),
        }

        let result = self.read_line_raw(prompt_len, history);
        let _ = self.term.disable_raw();
        result
    }

    /// Cooked-mode fallback when stdout isn't a TTY (spec.md §7
    /// `TerminalNotAvailable`).
    fn read_line_cooked(&mut self) -> Result<Option<String>> {
        Ok(self.reader.read_line()?)
    }

    fn read_line_raw(&mut self, prompt_len: usize, history: &HistoryRing) -> Result<Option<String>> {
        let mut buf = EditBuffer::new();
        let mut escape_buf: Option<Vec<u8>> = None;
        let mut history_index: Option<usize> = None;
        let mut saved_line: Option<String> = None;
        let mut completion_state: Option<CompletionState> = None;

        loop {
            let byte = self.reader.read_byte()?;
            let Some(byte) = byte else {
                if let Some(signal) = terminal::poll_signal() {
                    return self.handle_signal(signal);
                }
                thread::sleep(Duration::from_millis(10));
                continue;
            };

            let key = if let Some(buf_bytes) = escape_buf.as_mut() {
                buf_bytes.push(byte);
                match decode_escape(buf_bytes) {
                    EscapeDecode::Complete(k) => {
                        escape_buf = None;
                        k
                    }
                    EscapeDecode::Incomplete => {
                        if buf_bytes.len() >= MAX_ESCAPE_LEN {
                            escape_buf = None;
                        }
                        continue;
                    }
                    EscapeDecode::Invalid => {
                        escape_buf = None;
                        continue;
                    }
                }
            } else if byte == 0x1b {
                escape_buf = Some(Vec::new());
                continue;
            } else {
                match decode_byte(byte) {
                    Some(k) => k,
                    None => continue,
                }
            };

            if !matches!(key, Key::Tab) {
                completion_state = None;
            }

            match key {
                Key::Enter => {
                    self.writer.write_all(b"\r\n")?;
                    self.writer.flush()?;
                    return Ok(Some(buf.as_str().to_string()));
                }
                Key::CtrlC => {
                    self.writer.write_all(b"^C\r\n")?;
                    self.writer.flush()?;
                    return Err(ShellCoreError::Interrupted);
                }
                Key::CtrlD => {
                    if buf.is_empty() {
                        self.writer.write_all(b"\r\n")?;
                        self.writer.flush()?;
                        return Ok(None);
                    }
                    buf.delete_at_cursor();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlA | Key::Home => {
                    buf.move_home();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlE | Key::End => {
                    buf.move_end();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlB | Key::ArrowLeft => {
                    buf.move_left();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlF | Key::ArrowRight => {
                    buf.move_right();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlK => {
                    buf.kill_to_end();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlU => {
                    buf.kill_to_start();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::CtrlW => {
                    buf.delete_word_left();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::Backspace => {
                    buf.delete_left();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::Delete => {
                    buf.delete_at_cursor();
                    self.redraw(prompt_len, &buf)?;
                }
                Key::ArrowUp => {
                    self.history_prev(&mut buf, history, &mut history_index, &mut saved_line);
                    self.redraw(prompt_len, &buf)?;
                }
                Key::ArrowDown => {
                    self.history_next(&mut buf, history, &mut history_index, &mut saved_line);
                    self.redraw(prompt_len, &buf)?;
                }
                Key::PageUp | Key::PageDown => {
                    // No multi-page history view in this core; ignored.
                }
                Key::Tab => {
                    self.handle_tab(&mut buf, &mut completion_state)?;
                    self.redraw(prompt_len, &buf)?;
                }
                Key::Printable(b) => {
                    if !buf.insert(b) {
                        self.writer.write_all(&[0x07])?;
                        self.writer.flush()?;
                    }
                    self.redraw(prompt_len, &buf)?;
                }
            }
        }
    }

    fn handle_signal(&mut self, signal: terminal::Signal) -> Result<Option<String>> {
        match signal {
            terminal::Signal::Interrupt | terminal::Signal::Terminate => {
                self.writer.write_all(b"^C\r\n")?;
                self.writer.flush()?;
                Err(ShellCoreError::Interrupted)
            }
        }
    }

    fn history_prev(
        &self,
        buf: &mut EditBuffer,
        history: &HistoryRing,
        history_index: &mut Option<usize>,
        saved_line: &mut Option<String>,
    ) {
        if history_index.is_none() {
            *saved_line = Some(buf.as_str().to_string());
        }
        let next = history_index.map(|k| k + 1).unwrap_or(1);
        if let Some(entry) = history.get_from_newest(next) {
            *history_index = Some(next);
            buf.load(&entry.text);
        }
    }

    fn history_next(
        &self,
        buf: &mut EditBuffer,
        history: &HistoryRing,
        history_index: &mut Option<usize>,
        saved_line: &mut Option<String>,
    ) {
        match *history_index {
            None => {}
            Some(1) => {
                *history_index = None;
                match saved_line.take() {
                    Some(line) => buf.load(&line),
                    None => buf.clear(),
                }
            }
            Some(k) => {
                let next = k - 1;
                if let Some(entry) = history.get_from_newest(next) {
                    *history_index = Some(next);
                    buf.load(&entry.text);
                }
            }
        }
    }

    fn handle_tab(
        &mut self,
        buf: &mut EditBuffer,
        completion_state: &mut Option<CompletionState>,
    ) -> Result<()> {
        if let Some(state) = completion_state.as_mut() {
            let next = state.advance().to_string();
            let full = format!("{}{}", state.path_prefix, next);
            buf.splice(state.word_start, buf.len(), &full);
            return Ok(());
        }

        let Some(cb) = &self.completion else {
            return Ok(());
        };
        let word_start = buf.word_start();
        let word = buf.as_str()[word_start..buf.cursor()].to_string();
        let line_upto_cursor = buf.as_str()[..buf.cursor()].to_string();
        let candidates = cb(&word, &line_upto_cursor);

        match completion::first_tab(word_start, &word, candidates) {
            TabOutcome::Bell => {
                self.writer.write_all(&[0x07])?;
                self.writer.flush()?;
            }
            TabOutcome::Splice(suffix) => {
                let cursor = buf.cursor();
                buf.splice(cursor, cursor, &suffix);
            }
            TabOutcome::Listed(state) => {
                self.display_candidates(&state.candidates)?;
                let full = format!("{}{}", state.path_prefix, state.current());
                buf.splice(state.word_start, buf.len(), &full);
                *completion_state = Some(state);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_control_bytes() {
        assert_eq!(decode_byte(0x03), Some(Key::CtrlC));
        assert_eq!(decode_byte(0x04), Some(Key::CtrlD));
        assert_eq!(decode_byte(b'\r'), Some(Key::Enter));
        assert_eq!(decode_byte(0x7f), Some(Key::Backspace));
    }

    #[test]
    fn decodes_printable_range() {
        assert_eq!(decode_byte(b'a'), Some(Key::Printable(b'a')));
        assert_eq!(decode_byte(0x1f), None);
    }

    #[test]
    fn esc_byte_itself_is_not_decoded() {
        assert_eq!(decode_byte(0x1b), None);
    }

    #[test]
    fn decodes_arrow_sequences() {
        assert!(matches!(decode_escape(b"[A"), EscapeDecode::Complete(Key::ArrowUp)));
        assert!(matches!(decode_escape(b"[D"), EscapeDecode::Complete(Key::ArrowLeft)));
    }

    #[test]
    fn decodes_delete_tilde_sequence() {
        assert!(matches!(decode_escape(b"[3"), EscapeDecode::Incomplete));
        assert!(matches!(decode_escape(b"[3~"), EscapeDecode::Complete(Key::Delete)));
    }

    #[test]
    fn invalid_second_byte_is_invalid() {
        assert!(matches!(decode_escape(b"[Z"), EscapeDecode::Invalid));
    }

    #[test]
    fn non_bracket_first_byte_is_invalid() {
        assert!(matches!(decode_escape(b"O"), EscapeDecode::Invalid));
    }
}
