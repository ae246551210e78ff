//! Bounded line reader.
//!
//! Reads one `\n`-terminated line at a time into a buffer of fixed size and
//! rejects a line that, with its terminator, does not fit instead of
//! buffering it without bound. Invalid UTF-8 is
//! replaced lossily so a stray byte never aborts a scan.

use std::io::{BufRead, Read};

use crate::error::ScanError;

/// Line iterator over a buffered reader with a per-line buffer limit.
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    max_line_len: usize,
    line_number: usize,
}

impl<R: BufRead> LineScanner<R> {
    /// Wrap `reader` with a `max_line_len`-byte line buffer.
    ///
    /// A terminated line needs `len + 1 <= max_line_len`; an unterminated
    /// last line needs `len < max_line_len`.
    pub fn new(reader: R, max_line_len: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_len,
            line_number: 0,
        }
    }

    /// Number of lines returned so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line without its `\n` terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>, ScanError> {
        self.buf.clear();
        let line = self.line_number + 1;

        let cap = self.max_line_len as u64;
        let read = (&mut self.reader)
            .take(cap)
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| ScanError::Io { line, source })?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if self.buf.len() >= self.max_line_len {
            // Buffer filled without reaching a terminator.
            return Err(ScanError::LineTooLong {
                line,
                limit: self.max_line_len,
            });
        }

        self.line_number = line;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<String, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
