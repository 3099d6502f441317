//! The byte-stream source and its sliding window.
//!
//! Input reaches the scanner through a fixed-size window over the
//! underlying stream. When the lexer has consumed everything it can, the
//! unread tail is compacted to the front of the window and the remainder
//! is refilled from the stream. At end of input a NUL octet is placed
//! behind the last valid byte so the scanner always finds a sentinel.

use std::fs;
use std::io::{self, Read};

/// The size of the input window.
///
/// The window must be larger than the longest legal token; the worst case
/// is the single hex word of a maximum size generic record, at two
/// characters per octet.
pub(crate) const WINDOW_SIZE: usize = 256 * 1024;

//------------ Source --------------------------------------------------------

/// Where the bytes of a file frame come from.
pub(crate) enum Source<'i> {
    /// An open file.
    File(fs::File),

    /// The unread remainder of an in-memory buffer.
    ///
    /// The buffer is borrowed from the caller and never written to.
    Bytes(&'i [u8]),
}

impl<'i> Source<'i> {
    /// Reads into `buf`, returning the number of bytes read.
    ///
    /// Zero means end of input. Interrupted reads are retried.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match *self {
            Source::File(ref mut file) => loop {
                match file.read(buf) {
                    Ok(n) => return Ok(n),
                    Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            },
            Source::Bytes(ref mut data) => {
                let slice = std::mem::take(data);
                let n = slice.len().min(buf.len());
                buf[..n].copy_from_slice(&slice[..n]);
                *data = &slice[n..];
                Ok(n)
            }
        }
    }
}

//------------ Window --------------------------------------------------------

/// The sliding input window.
pub(crate) struct Window {
    /// The buffer, one octet larger than the window for the sentinel.
    data: Box<[u8]>,

    /// The number of valid octets at the start of the buffer.
    length: usize,
}

impl Window {
    /// Creates a new, empty window.
    pub fn new() -> Self {
        Window {
            data: vec![0; WINDOW_SIZE + 1].into_boxed_slice(),
            length: 0,
        }
    }

    /// Returns the valid portion of the window.
    pub fn valid(&self) -> &[u8] {
        &self.data[..self.length]
    }

    /// Returns the number of valid octets.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns whether the window is filled to capacity.
    pub fn is_full(&self) -> bool {
        self.length == WINDOW_SIZE
    }

    /// Discards everything before `keep_from` and refills from `source`.
    ///
    /// Returns the number of octets the remaining data moved down by and
    /// whether end of input was reached. In the latter case a NUL sentinel
    /// sits at [`len`][Self::len].
    pub fn refill(
        &mut self,
        source: &mut Source<'_>,
        keep_from: usize,
    ) -> io::Result<(usize, bool)> {
        debug_assert!(keep_from <= self.length);
        self.data.copy_within(keep_from..self.length, 0);
        self.length -= keep_from;

        let mut eof = false;
        while self.length < WINDOW_SIZE {
            let n = source.read(&mut self.data[self.length..WINDOW_SIZE])?;
            if n == 0 {
                eof = true;
                break;
            }
            self.length += n;
        }
        self.data[self.length] = 0;
        Ok((keep_from, eof))
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn refill_from_bytes() {
        let input = b"hello world";
        let mut source = Source::Bytes(input);
        let mut window = Window::new();
        let (shift, eof) = window.refill(&mut source, 0).unwrap();
        assert_eq!(shift, 0);
        assert!(eof);
        assert_eq!(window.valid(), input);
        assert_eq!(window.data[window.len()], 0);
    }

    #[test]
    fn compaction() {
        let mut source = Source::Bytes(b"abcdef");
        let mut window = Window::new();
        window.refill(&mut source, 0).unwrap();
        let (shift, eof) = window.refill(&mut source, 4).unwrap();
        assert_eq!(shift, 4);
        assert!(eof);
        assert_eq!(window.valid(), b"ef");
    }

    #[test]
    fn large_input_chunks() {
        let input = vec![b'x'; WINDOW_SIZE + 17];
        let mut source = Source::Bytes(&input);
        let mut window = Window::new();
        let (_, eof) = window.refill(&mut source, 0).unwrap();
        assert!(!eof);
        assert_eq!(window.len(), WINDOW_SIZE);
        let (shift, eof) = window.refill(&mut source, WINDOW_SIZE).unwrap();
        assert_eq!(shift, WINDOW_SIZE);
        assert!(eof);
        assert_eq!(window.len(), 17);
    }
}
