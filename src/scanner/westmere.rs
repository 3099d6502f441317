//! The SSE 4.2 scanner implementation.
//!
//! Classifies a 64 byte block with four 128 bit compares per interesting
//! character and assembles the per-byte results into the usual bitmasks
//! through `movemask`.

use super::{process_block, Carry, Code, Tape};
use core::arch::x86_64::*;

/// Classification masks for the 64 bytes at `ptr`.
///
/// # Safety
///
/// `ptr` must be valid for reads of 64 bytes and the CPU must support
/// SSE 4.2.
#[target_feature(enable = "sse4.2")]
unsafe fn classify(ptr: *const u8) -> (u64, u64) {
    let mut special = 0u64;
    let mut blank = 0u64;
    for i in 0..4 {
        let chunk = _mm_loadu_si128(ptr.add(i * 16) as *const __m128i);
        let sp = _mm_or_si128(
            _mm_or_si128(
                _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\n' as i8)),
                _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'"' as i8)),
            ),
            _mm_or_si128(
                _mm_or_si128(
                    _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'(' as i8)),
                    _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b')' as i8)),
                ),
                _mm_or_si128(
                    _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b';' as i8)),
                    _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\\' as i8)),
                ),
            ),
        );
        let bl = _mm_or_si128(
            _mm_or_si128(
                _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b' ' as i8)),
                _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\t' as i8)),
            ),
            _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\r' as i8)),
        );
        special |= (_mm_movemask_epi8(sp) as u32 as u64) << (i * 16);
        blank |= (_mm_movemask_epi8(bl) as u32 as u64) << (i * 16);
    }
    (special, blank)
}

/// Scans `data` and appends the structural offsets to `tape`.
///
/// # Safety
///
/// The CPU must support SSE 4.2.
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn index(data: &[u8], eof: bool, tape: &mut Tape) {
    let mut carry = Carry::default();
    let mut base = 0;
    while base + 64 <= data.len() {
        let (special, blank) = classify(data.as_ptr().add(base));
        process_block(data, base, special, blank, u64::MAX, &mut carry, tape);
        base += 64;
    }

    let rest = data.len() - base;
    if rest > 0 {
        // Copy the remainder into a zeroed block so the loads stay in
        // bounds; the valid mask keeps the padding out of the tape.
        let mut block = [0u8; 64];
        block[..rest].copy_from_slice(&data[base..]);
        let (special, blank) = classify(block.as_ptr());
        let valid = (1u64 << rest) - 1;
        process_block(data, base, special, blank, valid, &mut carry, tape);
    }

    if eof {
        tape.push(data.len(), Code::Sentinel);
    }
}
