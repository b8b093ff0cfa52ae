//! L1: buffered I/O.
//!
//! A small reader/writer pair over stdio, in the same shape the teacher
//! uses for `PersistentShell`'s PTY plumbing (a struct wrapping a boxed
//! `Read`/`Write`, batching into a fixed-size buffer), generalized to the
//! byte- and line-oriented reads/8 KiB write-batching the spec calls for.

use std::io::{self, ErrorKind, Read, Write};

use crate::limits::IO_BUFFER_SIZE;

/// Buffered byte-at-a-time reader with EOF-as-`None` semantics.
pub struct ByteReader<R: Read> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; IO_BUFFER_SIZE],
            pos: 0,
            filled: 0,
        }
    }

    fn refill(&mut self) -> io::Result<usize> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                    return Ok(0);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns `None` on EOF (or on a read that timed out with no bytes —
    /// the editor treats that identically: "no data, yield").
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos >= self.filled {
            self.filled = self.refill()?;
            self.pos = 0;
            if self.filled == 0 {
                return Ok(None);
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    /// Cooked-mode fallback: read a whole line, stripping the trailing
    /// newline. `None` on EOF with nothing read.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            match self.read_byte()? {
                None => {
                    if line.is_empty() {
                        return Ok(None);
                    }
                    break;
                }
                Some(b'\n') => break,
                Some(b'\r') => continue,
                Some(b) => line.push(b),
            }
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

/// Buffered writer that batches into `IO_BUFFER_SIZE` before flushing, to
/// amortize the cost of escape-sequence-heavy redraws.
pub struct LineWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(IO_BUFFER_SIZE),
        }
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() >= IO_BUFFER_SIZE {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        let mut written = 0;
        while written < self.buf.len() {
            match self.inner.write(&self.buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.buf.clear();
        self.inner.flush()
    }
}

impl<W: Write> Drop for LineWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_byte_yields_none_at_eof() {
        let mut r = ByteReader::new(Cursor::new(b"ab".to_vec()));
        assert_eq!(r.read_byte().unwrap(), Some(b'a'));
        assert_eq!(r.read_byte().unwrap(), Some(b'b'));
        assert_eq!(r.read_byte().unwrap(), None);
    }

    #[test]
    fn read_line_strips_crlf() {
        let mut r = ByteReader::new(Cursor::new(b"hello\r\nworld".to_vec()));
        assert_eq!(r.read_line().unwrap(), Some("hello".to_string()));
        assert_eq!(r.read_line().unwrap(), Some("world".to_string()));
        assert_eq!(r.read_line().unwrap(), None);
    }

    #[test]
    fn writer_batches_until_flush() {
        let mut out = Vec::new();
        {
            let mut w = LineWriter::new(&mut out);
            w.write_all(b"hi").unwrap();
            w.flush().unwrap();
        }
        assert_eq!(out, b"hi");
    }
}
