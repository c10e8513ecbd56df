// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Word-level bit-field helpers shared by heap reads, writes, and the
//! reduction prepass.

/// Mask selecting the low `count` bits, `count` in `0..=64`.
#[inline]
pub(crate) const fn mask(count: u32) -> u64 {
    if count >= 64 {
        u64::MAX
    } else {
        (1_u64 << count) - 1
    }
}

/// Extract `count` bits of `word` starting at `offset`.
///
/// `offset + count` must not exceed 64.
#[inline]
pub(crate) const fn extract(word: u64, offset: u32, count: u32) -> u64 {
    (word >> offset) & mask(count)
}

/// Overwrite `count` bits of `word` starting at `offset` with the low
/// `count` bits of `data`.
///
/// `offset + count` must not exceed 64.
#[inline]
pub(crate) fn insert(word: &mut u64, offset: u32, count: u32, data: u64) {
    let m = mask(count) << offset;
    *word = (*word & !m) | ((data << offset) & m);
}
