//! Character sources the `Engine` reads from.
//!
//! The engine only ever asks for "the next character, or end of stream", so
//! anything that can answer that can be tokenized: a string slice, a `Chars`
//! iterator, or a buffered reader decoded as UTF-8 on the fly.

use std::io::{self, BufRead};
use std::str::{self, Chars};

/// A stream of characters with an explicit end-of-stream signal.
pub trait CharSource {
    /// Returns the next character, `Ok(None)` at end of stream.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// A source over an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// A source decoding UTF-8 from a buffered reader one character at a time.
///
/// Malformed or truncated UTF-8 is reported as an `InvalidData` I/O error.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.reader.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.reader.consume(1);
        Ok(Some(byte))
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, 0 if `lead` cannot
/// start one.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let lead = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let len = sequence_len(lead);
        if len == 0 {
            return Err(invalid_utf8("invalid UTF-8 lead byte"));
        }
        if len == 1 {
            return Ok(Some(lead as char));
        }

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or_else(|| invalid_utf8("truncated UTF-8 sequence"))?;
        }
        let decoded =
            str::from_utf8(&buf[..len]).map_err(|_| invalid_utf8("invalid UTF-8 sequence"))?;
        Ok(decoded.chars().next())
    }
}
