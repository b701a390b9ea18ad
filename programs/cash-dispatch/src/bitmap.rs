//! Expandable settlement bitmap: bit `i` of the word vector records whether
//! leaf index `i` has been paid.

use anchor_lang::prelude::*;

use crate::{
    constants::{BITMAP_ARRAY_STEP, BITMAP_WORD_BITS},
    errors::DistributionError,
};

/// Words needed to cover `total_recipients` bits
pub fn required_words(total_recipients: u64) -> usize {
    usize::try_from(total_recipients.div_ceil(BITMAP_WORD_BITS)).unwrap_or(usize::MAX)
}

/// Words allocated at initialize; larger batches grow via expand
pub fn initial_words(total_recipients: u64) -> usize {
    required_words(total_recipients).min(BITMAP_ARRAY_STEP)
}

pub fn covers(words: &[u64], total_recipients: u64) -> bool {
    words.len() >= required_words(total_recipients)
}

fn locate(index: u64) -> Option<(usize, u64)> {
    let word = usize::try_from(index / BITMAP_WORD_BITS).ok()?;
    Some((word, 1u64 << (index % BITMAP_WORD_BITS)))
}

/// False for indices beyond the current coverage
pub fn is_set(words: &[u64], index: u64) -> bool {
    locate(index)
        .and_then(|(word, mask)| words.get(word).map(|bits| bits & mask != 0))
        .unwrap_or(false)
}

/// Sets the bit for `index`, returning whether it was previously clear
pub fn set(words: &mut [u64], index: u64) -> Result<bool> {
    let (word, mask) = locate(index).ok_or(DistributionError::IndexOutOfBounds)?;
    let bits = words
        .get_mut(word)
        .ok_or(DistributionError::IndexOutOfBounds)?;
    let newly_set = *bits & mask == 0;
    *bits |= mask;
    Ok(newly_set)
}

/// Appends at most one step of zeroed words toward `target_words`.
/// Returns the number of words added.
pub fn grow(words: &mut Vec<u64>, target_words: usize) -> usize {
    let added = target_words
        .saturating_sub(words.len())
        .min(BITMAP_ARRAY_STEP);
    words.resize(words.len() + added, 0);
    added
}

/// Number of set bits
#[cfg(test)]
pub fn count_set(words: &[u64]) -> u64 {
    words.iter().map(|word| u64::from(word.count_ones())).sum()
}
