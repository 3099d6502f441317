//! Decoding and encoding of base 32.
//!
//! Only the `base32hex` variant of [RFC 4648] without padding is
//! implemented, since that is the flavor used by DNS -- most prominently by
//! the next hashed owner name of NSEC3 records.
//!
//! [RFC 4648]: https://tools.ietf.org/html/rfc4648

use super::DecodeError;
use core::fmt;

//------------ Convenience Functions -----------------------------------------

/// Decodes a string with unpadded base32hex encoded data.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, DecodeError> {
    let mut res = Vec::with_capacity(s.len() * 5 / 8 + 1);
    let mut decoder = Decoder::new();
    for ch in s.bytes() {
        decoder.push(&mut res, ch)?;
    }
    decoder.finalize(&mut res)?;
    Ok(res)
}

/// Encodes binary data in unpadded base32hex and writes it into a stream.
pub fn display_hex<B, W>(bytes: &B, f: &mut W) -> fmt::Result
where
    B: AsRef<[u8]> + ?Sized,
    W: fmt::Write,
{
    const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

    for chunk in bytes.as_ref().chunks(5) {
        let mut buf = [0u8; 5];
        buf[..chunk.len()].copy_from_slice(chunk);
        let groups = [
            buf[0] >> 3,
            (buf[0] << 2 | buf[1] >> 6) & 0x1F,
            (buf[1] >> 1) & 0x1F,
            (buf[1] << 4 | buf[2] >> 4) & 0x1F,
            (buf[2] << 1 | buf[3] >> 7) & 0x1F,
            (buf[3] >> 2) & 0x1F,
            (buf[3] << 3 | buf[4] >> 5) & 0x1F,
            buf[4] & 0x1F,
        ];
        let count = match chunk.len() {
            1 => 2,
            2 => 4,
            3 => 5,
            4 => 7,
            _ => 8,
        };
        for &group in &groups[..count] {
            f.write_char(ALPHABET[group as usize] as char)?;
        }
    }
    Ok(())
}

//------------ Decoder -------------------------------------------------------

/// An unpadded base32hex decoder.
///
/// Characters are pushed one at a time; every complete group of eight
/// appends five octets to the output. [`finalize`][Self::finalize] flushes
/// a trailing partial group.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    /// A buffer for up to eight characters worth of data.
    buf: [u8; 8],

    /// The number of characters currently in the buffer.
    next: usize,
}

impl Decoder {
    /// Creates a new decoder.
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Feeds a single character to the decoder.
    pub fn push(
        &mut self,
        out: &mut Vec<u8>,
        ch: u8,
    ) -> Result<(), DecodeError> {
        let value = match ch {
            b'0'..=b'9' => ch - b'0',
            b'A'..=b'V' => ch - b'A' + 10,
            b'a'..=b'v' => ch - b'a' + 10,
            _ => return Err(DecodeError::BadSymbol(ch)),
        };
        self.buf[self.next] = value;
        self.next += 1;
        if self.next == 8 {
            self.flush(out, 8);
            self.next = 0;
        }
        Ok(())
    }

    /// Flushes a final partial group and checks its length.
    pub fn finalize(self, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        match self.next {
            0 => Ok(()),
            // A group of five bits ends an octet after 2, 4, 5, or 7
            // characters; anything else cannot encode whole octets.
            2 | 4 | 5 | 7 => {
                self.flush(out, self.next);
                Ok(())
            }
            _ => Err(DecodeError::ShortInput),
        }
    }

    /// Appends the octets encoded by the first `count` buffered characters.
    fn flush(&self, out: &mut Vec<u8>, count: usize) {
        let b = &self.buf;
        let octets = [
            b[0] << 3 | b[1] >> 2,
            b[1] << 6 | b[2] << 1 | b[3] >> 4,
            b[3] << 4 | b[4] >> 1,
            b[4] << 7 | b[5] << 2 | b[6] >> 3,
            b[6] << 5 | b[7],
        ];
        let len = match count {
            2 => 1,
            4 => 2,
            5 => 3,
            7 => 4,
            _ => 5,
        };
        out.extend_from_slice(&octets[..len]);
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_str() {
        // The test vectors from RFC 4648, section 10.
        assert_eq!(decode_hex("").unwrap(), b"");
        assert_eq!(decode_hex("CO").unwrap(), b"f");
        assert_eq!(decode_hex("CPNG").unwrap(), b"fo");
        assert_eq!(decode_hex("CPNMU").unwrap(), b"foo");
        assert_eq!(decode_hex("CPNMUOG").unwrap(), b"foob");
        assert_eq!(decode_hex("CPNMUOJ1").unwrap(), b"fooba");
        assert_eq!(decode_hex("CPNMUOJ1E8").unwrap(), b"foobar");
        assert_eq!(decode_hex("cpnmuoj1e8").unwrap(), b"foobar");
        assert_eq!(decode_hex("C"), Err(DecodeError::ShortInput));
        assert_eq!(decode_hex("CW"), Err(DecodeError::BadSymbol(b'W')));
    }

    #[test]
    fn round_trip() {
        let data = b"foobar";
        let mut s = String::new();
        display_hex(data, &mut s).unwrap();
        assert_eq!(s, "CPNMUOJ1E8");
        assert_eq!(decode_hex(&s).unwrap(), data);
    }
}
