//! The structural scanner.
//!
//! Before any tokens are assembled, a scanning pass locates the bytes the
//! lexer needs to look at: the structural characters of the zone file
//! grammar and the edges of token and white-space runs. The offsets of
//! these bytes are appended, in input order, to a [`Tape`] that the lexer
//! then drains.
//!
//! Finding structural bytes is a branch-free classification problem, which
//! is why it is split off from the stateful lexer: the hot loop compares
//! every byte of a 64 byte block against the few interesting characters
//! and turns the results into bitmasks. Besides the portable
//! [`fallback`] implementation there are vectorized variants for the
//! SSE 4.2 ([`westmere`]) and AVX2 ([`haswell`]) feature levels. All
//! variants produce byte-identical tapes; [`Target`] picks the best one
//! available at runtime.

pub(crate) mod fallback;
#[cfg(target_arch = "x86_64")]
pub(crate) mod haswell;
#[cfg(target_arch = "x86_64")]
pub(crate) mod westmere;

use std::env;

//------------ Code ----------------------------------------------------------

/// The classification of an indexed byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Code {
    /// The first byte of a run of ordinary token bytes.
    Contiguous,

    /// The first byte of a run of blanks (space, tab, carriage return).
    Blank,

    /// A line feed.
    Newline,

    /// A double quote.
    Quote,

    /// An opening parenthesis.
    OpenGroup,

    /// A closing parenthesis.
    CloseGroup,

    /// A semicolon starting a comment.
    Comment,

    /// A backslash starting an escape sequence.
    Escape,

    /// The NUL sentinel behind the last byte of input.
    Sentinel,
}

/// Classifies a single byte.
///
/// Used when turning mask bits back into tape entries; all variants agree
/// with this table by construction.
#[inline]
fn code_of(byte: u8) -> Code {
    match byte {
        b' ' | b'\t' | b'\r' => Code::Blank,
        b'\n' => Code::Newline,
        b'"' => Code::Quote,
        b'(' => Code::OpenGroup,
        b')' => Code::CloseGroup,
        b';' => Code::Comment,
        b'\\' => Code::Escape,
        _ => Code::Contiguous,
    }
}

//------------ Index ---------------------------------------------------------

/// A single entry of the tape.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Index {
    /// The offset of the byte within the window.
    pub offset: u32,

    /// What kind of byte lives there.
    pub code: Code,
}

//------------ Tape ----------------------------------------------------------

/// The ordered sequence of structural byte offsets.
///
/// The scanner appends at the back, the lexer reads from the front. The
/// tape is rebuilt from scratch after every window refill, so entries are
/// only ever valid for the current window contents.
#[derive(Debug, Default)]
pub(crate) struct Tape {
    entries: Vec<Index>,
    head: usize,
}

impl Tape {
    /// Creates a new, empty tape.
    pub fn new() -> Self {
        Tape {
            entries: Vec::with_capacity(4096),
            head: 0,
        }
    }

    /// Discards all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
    }

    /// Appends an entry.
    #[inline]
    pub fn push(&mut self, offset: usize, code: Code) {
        self.entries.push(Index {
            offset: offset as u32,
            code,
        });
    }

    /// Returns the entry at the read cursor without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<Index> {
        self.entries.get(self.head).copied()
    }

    /// Moves the read cursor past the current entry.
    #[inline]
    pub fn advance(&mut self) {
        debug_assert!(self.head < self.entries.len());
        self.head += 1;
    }

    /// Returns all entries, for tests comparing scanner variants.
    #[cfg(test)]
    pub fn entries(&self) -> &[Index] {
        &self.entries
    }
}

//------------ Block Processing ----------------------------------------------

/// Carries run state from one 64 byte block into the next.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Carry {
    /// Whether the last byte of the previous block was a token byte.
    contiguous: u64,

    /// Whether the last byte of the previous block was a blank.
    blank: u64,
}

/// Turns the classification masks of one block into tape entries.
///
/// `special` marks the structural characters, `blank` the blanks, and
/// `valid` which bits of the block hold input at all. An entry is made for
/// every special byte and for the first byte of every run of token bytes
/// or blanks; the run edges are what lets the lexer skip over the run
/// without inspecting it byte by byte.
#[inline]
pub(crate) fn process_block(
    data: &[u8],
    base: usize,
    special: u64,
    blank: u64,
    valid: u64,
    carry: &mut Carry,
    tape: &mut Tape,
) {
    let contiguous = !(special | blank);
    let contiguous_start =
        contiguous & !((contiguous << 1) | carry.contiguous);
    let blank_start = blank & !((blank << 1) | carry.blank);
    carry.contiguous = (contiguous & valid) >> 63;
    carry.blank = (blank & valid) >> 63;

    let mut mask = (special | contiguous_start | blank_start) & valid;
    while mask != 0 {
        let bit = mask.trailing_zeros() as usize;
        let offset = base + bit;
        tape.push(offset, code_of(data[offset]));
        mask &= mask - 1;
    }
}

//------------ Target --------------------------------------------------------

/// A scanner implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Target {
    /// The AVX2 implementation.
    #[cfg(target_arch = "x86_64")]
    Haswell,

    /// The SSE 4.2 implementation.
    #[cfg(target_arch = "x86_64")]
    Westmere,

    /// The portable implementation.
    Fallback,
}

/// All targets, best first.
#[cfg(target_arch = "x86_64")]
const TARGETS: &[Target] =
    &[Target::Haswell, Target::Westmere, Target::Fallback];

#[cfg(not(target_arch = "x86_64"))]
const TARGETS: &[Target] = &[Target::Fallback];

impl Target {
    /// Returns the name used by the `ZONE_TARGET` environment variable.
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(target_arch = "x86_64")]
            Target::Haswell => "haswell",
            #[cfg(target_arch = "x86_64")]
            Target::Westmere => "westmere",
            Target::Fallback => "fallback",
        }
    }

    /// Returns whether the CPU supports this implementation.
    fn supported(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            Target::Haswell => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "x86_64")]
            Target::Westmere => is_x86_feature_detected!("sse4.2"),
            Target::Fallback => true,
        }
    }

    /// Scans `data` and appends the structural offsets to `tape`.
    ///
    /// If `eof` is set, a [`Code::Sentinel`] entry for the position just
    /// behind the data is appended as well.
    pub fn index(self, data: &[u8], eof: bool, tape: &mut Tape) {
        match self {
            #[cfg(target_arch = "x86_64")]
            Target::Haswell => unsafe { haswell::index(data, eof, tape) },
            #[cfg(target_arch = "x86_64")]
            Target::Westmere => unsafe { westmere::index(data, eof, tape) },
            Target::Fallback => fallback::index(data, eof, tape),
        }
    }
}

/// Selects the scanner implementation to use.
///
/// The `ZONE_TARGET` environment variable names a preferred
/// implementation; unknown values silently fall back to feature-based
/// selection, and so does naming an implementation the CPU cannot run.
pub(crate) fn select() -> Target {
    let mut start = 0;
    if let Ok(preferred) = env::var("ZONE_TARGET") {
        if let Some(pos) = TARGETS
            .iter()
            .position(|t| t.name().eq_ignore_ascii_case(&preferred))
        {
            start = pos;
        }
    }
    TARGETS[start..]
        .iter()
        .copied()
        .find(|t| t.supported())
        .unwrap_or(Target::Fallback)
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn run(target: Target, data: &[u8]) -> Vec<Index> {
        let mut tape = Tape::new();
        target.index(data, true, &mut tape);
        tape.entries().to_vec()
    }

    #[test]
    fn fallback_classification() {
        let entries = run(Target::Fallback, b"a  b;c\n");
        assert_eq!(
            entries,
            vec![
                Index { offset: 0, code: Code::Contiguous },
                Index { offset: 1, code: Code::Blank },
                Index { offset: 3, code: Code::Contiguous },
                Index { offset: 4, code: Code::Comment },
                Index { offset: 5, code: Code::Contiguous },
                Index { offset: 6, code: Code::Newline },
                Index { offset: 7, code: Code::Sentinel },
            ]
        );
    }

    #[test]
    fn specials_break_runs() {
        let entries = run(Target::Fallback, b"a(b)\"c\"");
        let codes: Vec<_> = entries.iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                Code::Contiguous,
                Code::OpenGroup,
                Code::Contiguous,
                Code::CloseGroup,
                Code::Quote,
                Code::Contiguous,
                Code::Quote,
                Code::Sentinel,
            ]
        );
    }

    #[test]
    fn idempotence() {
        let data = b"foo 300 IN A 192.0.2.1 ; host\n";
        assert_eq!(run(Target::Fallback, data), run(Target::Fallback, data));
    }

    /// All variants must produce byte-identical tapes.
    #[test]
    fn variant_equivalence() {
        let mut samples: Vec<Vec<u8>> = vec![
            b"".to_vec(),
            b"www 3600 IN A 192.0.2.1\n".to_vec(),
            b"@ IN SOA ns. host. ( 1 2 3 4 5 )\n".to_vec(),
            b"txt TXT \"some \\\"quoted\\\" text\" more\n".to_vec(),
            b"; nothing but a comment".to_vec(),
        ];
        // A sample that crosses several block boundaries with runs of
        // every class.
        let mut long = Vec::new();
        for i in 0..1024u32 {
            long.extend_from_slice(match i % 7 {
                0 => &b"name "[..],
                1 => &b"    "[..],
                2 => &b"(\n)"[..],
                3 => &b"\"q s\""[..],
                4 => &b"\\; "[..],
                5 => &b"A 192.0.2.7 "[..],
                _ => &b";c\n"[..],
            });
        }
        samples.push(long);

        for data in &samples {
            let expected = run(Target::Fallback, data);
            #[cfg(target_arch = "x86_64")]
            {
                if Target::Westmere.supported() {
                    assert_eq!(run(Target::Westmere, data), expected);
                }
                if Target::Haswell.supported() {
                    assert_eq!(run(Target::Haswell, data), expected);
                }
            }
            // Re-running a variant over the same window is idempotent.
            assert_eq!(run(Target::Fallback, data), expected);
        }
    }

    #[test]
    fn selection_falls_back() {
        // Whatever the CPU, selection must return something runnable.
        let target = select();
        assert!(target.supported());
    }
}
