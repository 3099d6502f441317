//! The portable scanner implementation.
//!
//! Builds the same per-block classification masks as the vectorized
//! variants, just one byte at a time. Keeping the block structure makes
//! the tape provably identical across implementations: everything after
//! mask construction is shared code.

use super::{process_block, Carry, Code, Tape};

/// Classification masks for one 64 byte block.
#[inline]
fn classify(block: &[u8]) -> (u64, u64) {
    let mut special = 0u64;
    let mut blank = 0u64;
    for (i, &byte) in block.iter().enumerate() {
        match byte {
            b' ' | b'\t' | b'\r' => blank |= 1 << i,
            b'\n' | b'"' | b'(' | b')' | b';' | b'\\' => special |= 1 << i,
            _ => {}
        }
    }
    (special, blank)
}

/// Scans `data` and appends the structural offsets to `tape`.
pub(crate) fn index(data: &[u8], eof: bool, tape: &mut Tape) {
    let mut carry = Carry::default();
    let mut base = 0;
    while base + 64 <= data.len() {
        let (special, blank) = classify(&data[base..base + 64]);
        process_block(data, base, special, blank, u64::MAX, &mut carry, tape);
        base += 64;
    }

    let rest = data.len() - base;
    if rest > 0 {
        let (special, blank) = classify(&data[base..]);
        let valid = (1u64 << rest) - 1;
        process_block(data, base, special, blank, valid, &mut carry, tape);
    }

    if eof {
        tape.push(data.len(), Code::Sentinel);
    }
}
