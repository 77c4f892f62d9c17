//! PKCS#7 padding.
//!
//! `pad` always appends between 1 and `block_size` bytes, each equal to the
//! pad count. An input that is already block-aligned gains a full block, so
//! "no padding" can never be confused with "exact multiple".
//!
//! `unpad` checks every pad byte. It is still not an integrity check: random
//! garbage ends in a valid pad with probability of roughly 1/256.

use common::{EnvelopeError, Result};

/// Append PKCS#7 padding for `block_size` (1..=255).
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));
    let n = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Strip PKCS#7 padding, returning the unpadded prefix of `data`.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidPadding`] if `data` is empty or not a
/// multiple of `block_size`, if the pad count is 0 or larger than
/// `block_size`, or if any pad byte differs from the count.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8]> {
    let Some(&last) = data.last() else {
        return Err(EnvelopeError::InvalidPadding);
    };
    if data.len() % block_size != 0 {
        return Err(EnvelopeError::InvalidPadding);
    }

    let n = usize::from(last);
    if n == 0 || n > block_size || n > data.len() {
        return Err(EnvelopeError::InvalidPadding);
    }

    let (body, padding) = data.split_at(data.len() - n);
    if padding.iter().any(|&b| b != last) {
        return Err(EnvelopeError::InvalidPadding);
    }
    Ok(body)
}
