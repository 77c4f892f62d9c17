//! Source of IV, nonce, and key bytes.

use common::{EnvelopeError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Anything that can fill a buffer with unpredictable bytes.
///
/// Every IV and nonce drawn by the envelope layer goes through this trait, so
/// a failing source surfaces as [`EnvelopeError::RandomSourceError`] instead
/// of a panic.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Fill `dest` completely or fail.
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EnvelopeError::RandomSourceError(e.to_string()))
    }
}

/// Draw a fixed-size array from `rng`.
pub(crate) fn random_array<const N: usize, R>(rng: &mut R) -> Result<[u8; N]>
where
    R: RandomSource + ?Sized,
{
    let mut buf = [0u8; N];
    rng.try_fill(&mut buf)?;
    Ok(buf)
}
