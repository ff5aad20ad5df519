//! Logical line reader.
//!
//! A logical line is one or more physical lines joined by a trailing
//! unescaped backslash. Physical lines may end in `\n` or `\r\n`; the
//! terminator is never part of the returned text.

use std::io::BufRead;

use crate::error::Result;

/// One logical line along with the 1-based number of its first physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub number: usize,
    pub text: String,
}

/// Reads logical lines from a buffered source.
///
/// The reader owns its source, so the underlying stream is released when the
/// reader is dropped, including when a caller stops early on an error.
///
/// # Examples
///
/// ```rust
/// use commented_properties::reader::LineReader;
///
/// let mut reader = LineReader::new("a=1\\\n2\r\nb=3".as_bytes());
///
/// let first = reader.next_line().unwrap().unwrap();
/// assert_eq!((first.number, first.text.as_str()), (1, "a=12"));
///
/// let second = reader.next_line().unwrap().unwrap();
/// assert_eq!((second.number, second.text.as_str()), (3, "b=3"));
///
/// assert!(reader.next_line().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    physical: usize,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            physical: 0,
            buf: String::new(),
        }
    }

    /// Returns the next logical line, or `None` at end of input.
    ///
    /// A physical line starting with `#` or `!` is returned alone; a
    /// trailing backslash on it is part of the comment.
    ///
    /// A continuation on the last physical line yields whatever was
    /// collected so far.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying reader, including invalid UTF-8.
    pub fn next_line(&mut self) -> Result<Option<LogicalLine>> {
        if !self.read_physical()? {
            return Ok(None);
        }
        let number = self.physical;
        if is_comment(&self.buf) {
            return Ok(Some(LogicalLine {
                number,
                text: std::mem::take(&mut self.buf),
            }));
        }
        let mut text = String::new();
        loop {
            let continued = ends_with_continuation(&self.buf);
            if continued {
                self.buf.pop();
            }
            text.push_str(&self.buf);
            if !continued || !self.read_physical()? {
                break;
            }
        }
        Ok(Some(LogicalLine { number, text }))
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_physical(&mut self) -> Result<bool> {
        self.buf.clear();
        if self.inner.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        if self.buf.ends_with('\n') {
            self.buf.pop();
        }
        if self.buf.ends_with('\r') {
            self.buf.pop();
        }
        self.physical += 1;
        Ok(true)
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Comment lines never continue, whatever they end with.
fn is_comment(line: &str) -> bool {
    line.trim_start_matches([' ', '\t', '\x0C'])
        .starts_with(['#', '!'])
}

/// An odd number of trailing backslashes means the last one is unescaped.
fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}
