//! Domain names in wire format.
//!
//! Owner names and name fields in record data are emitted as uncompressed
//! wire format: a sequence of labels, each preceded by its length, ending
//! with the empty root label. [`Name`] keeps such a sequence inline in a
//! fixed buffer of the maximum name length, which lets the parser copy and
//! overwrite names without touching the heap.

use crate::symbol::{Sym, Symbols};
use core::{fmt, hash, str};

//------------ Name ----------------------------------------------------------

/// An absolute domain name in wire format.
#[derive(Clone, Copy)]
pub struct Name {
    /// The length of the name in octets.
    length: u8,

    /// The octets of the name.
    ///
    /// Only the first `length` octets are meaningful.
    octets: [u8; 255],
}

impl Name {
    /// The root name.
    pub const ROOT: Name = Name {
        length: 1,
        octets: [0; 255],
    };

    /// Parses a name from its textual representation.
    ///
    /// The text is the raw token from a zone file: escape sequences are
    /// still present and label-separating dots are the unescaped ones. A
    /// name ending in a dot is absolute; otherwise `origin` is appended.
    /// If a relative name is given but no origin, an error is returned.
    ///
    /// The special owner `@` is handled by the caller; here it is simply a
    /// name consisting of the label `@`.
    pub fn from_text(
        text: &[u8],
        origin: Option<&Name>,
    ) -> Result<Self, NameError> {
        if text.is_empty() {
            return Err(NameError::Empty);
        }
        if text == b"." {
            return Ok(Name::ROOT);
        }

        let mut octets = [0u8; 255];
        let mut length = 0usize;
        let mut label = [0u8; 63];
        let mut label_len = 0usize;
        let mut seen_content = false;

        for sym in Symbols::new(text) {
            let sym = sym.map_err(|_| NameError::BadEscape)?;
            match sym {
                Sym::Char(b'.') => {
                    if label_len == 0 {
                        // An empty label: a leading dot or two dots in a
                        // row. Only the root name, handled above, may
                        // consist of nothing but a dot.
                        return Err(NameError::EmptyLabel);
                    }
                    // Leave room for at least the root label behind us.
                    if length + 1 + label_len > 254 {
                        return Err(NameError::LongName);
                    }
                    octets[length] = label_len as u8;
                    octets[length + 1..length + 1 + label_len]
                        .copy_from_slice(&label[..label_len]);
                    length += 1 + label_len;
                    label_len = 0;
                }
                sym => {
                    if label_len == 63 {
                        return Err(NameError::LongLabel);
                    }
                    label[label_len] = sym.octet();
                    label_len += 1;
                    seen_content = true;
                }
            }
        }

        if !seen_content {
            // Nothing but dots, e.g. "..".
            return Err(NameError::EmptyLabel);
        }

        if label_len > 0 {
            // The name did not end in a dot: store the last label, then
            // complete the relative name with the origin.
            if length + 1 + label_len > 254 {
                return Err(NameError::LongName);
            }
            octets[length] = label_len as u8;
            octets[length + 1..length + 1 + label_len]
                .copy_from_slice(&label[..label_len]);
            length += 1 + label_len;

            let origin = origin.ok_or(NameError::Relative)?;
            if length + origin.len() > 255 {
                return Err(NameError::LongName);
            }
            octets[length..length + origin.len()]
                .copy_from_slice(origin.as_slice());
            length += origin.len();
        } else {
            // The name ended in a dot and is absolute.
            octets[length] = 0;
            length += 1;
        }

        Ok(Name {
            length: length as u8,
            octets,
        })
    }

    /// Returns the octets of the name.
    pub fn as_slice(&self) -> &[u8] {
        &self.octets[..self.length as usize]
    }

    /// Returns the length of the name in octets.
    #[allow(clippy::len_without_is_empty)] // a name is never empty
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Returns whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.length == 1
    }

    /// Returns an iterator over the labels of the name.
    ///
    /// The final root label is not included.
    pub fn iter_labels(&self) -> impl Iterator<Item = &[u8]> {
        LabelIter {
            slice: self.as_slice(),
        }
    }
}

//--- Default

impl Default for Name {
    fn default() -> Self {
        Name::ROOT
    }
}

//--- FromStr

impl str::FromStr for Name {
    type Err = NameError;

    /// Parses an absolute name from a string.
    ///
    /// Since there is no origin to complete relative names with, the name
    /// must end in a dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::from_text(s.as_bytes(), None)
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Name {}

impl hash::Hash for Name {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

//--- Display and Debug

impl fmt::Display for Name {
    /// Formats the name in its textual form.
    ///
    /// The output is absolute, i.e., it ends in a dot, and uses escape
    /// sequences for dots and backslashes within labels as well as for
    /// non-printable octets. Parsing the output yields the same name.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use core::fmt::Write;

        if self.is_root() {
            return f.write_str(".");
        }
        for label in self.iter_labels() {
            for &ch in label {
                match ch {
                    b'.' | b'\\' => {
                        f.write_char('\\')?;
                        f.write_char(ch as char)?;
                    }
                    0x21..=0x7E => f.write_char(ch as char)?,
                    _ => write!(f, "\\{:03}", ch)?,
                }
            }
            f.write_char('.')?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

//------------ LabelIter -----------------------------------------------------

/// An iterator over the labels in a name.
struct LabelIter<'a> {
    slice: &'a [u8],
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, tail) = self.slice.split_first()?;
        if len == 0 {
            return None;
        }
        let (label, tail) = tail.split_at(len as usize);
        self.slice = tail;
        Some(label)
    }
}

//------------ NameError -----------------------------------------------------

/// A domain name could not be parsed from its textual form.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameError {
    /// The name was empty.
    Empty,

    /// A label was empty in a position other than the root.
    EmptyLabel,

    /// A label was longer than 63 octets.
    LongLabel,

    /// The name was longer than 255 octets.
    LongName,

    /// The name was relative but no origin was available.
    Relative,

    /// The name contained an illegal escape sequence.
    BadEscape,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            NameError::Empty => "empty name",
            NameError::EmptyLabel => "empty label",
            NameError::LongLabel => "label exceeds 63 octets",
            NameError::LongName => "name exceeds 255 octets",
            NameError::Relative => "relative name without origin",
            NameError::BadEscape => "illegal escape sequence",
        })
    }
}

impl std::error::Error for NameError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::string::ToString;

    fn name(text: &str, origin: Option<&Name>) -> Name {
        Name::from_text(text.as_bytes(), origin).unwrap()
    }

    #[test]
    fn absolute() {
        assert_eq!(
            name("example.com.", None).as_slice(),
            b"\x07example\x03com\x00"
        );
        assert_eq!(name(".", None).as_slice(), b"\x00");
        assert_eq!(name("a.", None).as_slice(), b"\x01a\x00");
    }

    #[test]
    fn relative() {
        let origin = name("example.com.", None);
        assert_eq!(
            name("www", Some(&origin)).as_slice(),
            b"\x03www\x07example\x03com\x00"
        );
        assert_eq!(
            Name::from_text(b"www", None),
            Err(NameError::Relative)
        );
    }

    #[test]
    fn escapes() {
        // An escaped dot is part of the label, not a separator.
        assert_eq!(name("a\\.b.", None).as_slice(), b"\x03a.b\x00");
        assert_eq!(name("a\\046b.", None).as_slice(), b"\x03a.b\x00");
        assert_eq!(name("\\065.", None).as_slice(), b"\x01A\x00");
    }

    #[test]
    fn bad_names() {
        assert_eq!(
            Name::from_text(b"a..b.", None),
            Err(NameError::EmptyLabel)
        );
        assert_eq!(
            Name::from_text(b".a.", None),
            Err(NameError::EmptyLabel)
        );
        assert_eq!(Name::from_text(b"", None), Err(NameError::Empty));
        let long_label = [b'x'; 64];
        assert_eq!(
            Name::from_text(&long_label, None),
            Err(NameError::LongLabel)
        );
    }

    #[test]
    fn long_names() {
        // Four labels of 63 octets plus the root exceed 255 octets.
        let label = "x".repeat(63);
        let text = format!("{0}.{0}.{0}.{0}.", label);
        assert_eq!(
            Name::from_text(text.as_bytes(), None),
            Err(NameError::LongName)
        );
        // Three labels of 63 and one of 61 fit exactly.
        let text = format!("{0}.{0}.{0}.{1}.", label, "x".repeat(61));
        assert_eq!(
            Name::from_text(text.as_bytes(), None).unwrap().len(),
            255
        );
    }

    #[test]
    fn display_round_trip() {
        for text in ["example.com.", "a\\.b.example.", "\\000\\255.x."] {
            let parsed = name(text, None);
            let shown = parsed.to_string();
            assert_eq!(
                Name::from_text(shown.as_bytes(), None).unwrap(),
                parsed
            );
        }
        assert_eq!(name("example.com.", None).to_string(), "example.com.");
        assert_eq!(Name::ROOT.to_string(), ".");
    }
}
