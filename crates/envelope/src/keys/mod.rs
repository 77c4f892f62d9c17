//! Key generation.
//!
//! Two separate capabilities:
//!
//! - [`generate_key`] draws real key material from the OS CSPRNG over the
//!   full byte range. Use it for anything that protects data.
//! - [`fixture_key`] produces letters-only (`a-zA-Z`) byte strings from a
//!   non-cryptographic RNG. It is handy as printable test data and is **not**
//!   key material: 52 symbols per byte and a predictable generator.

pub mod material;

pub use material::KeyMaterial;

use common::protocol::Algorithm;
use common::{EnvelopeError, Result};
use rand::Rng;
use tracing::debug;

use crate::crypto::random::{OsRandom, RandomSource};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate `len` bytes of key material from the OS CSPRNG.
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] if `len` is zero.
/// - [`EnvelopeError::RandomSourceError`] if the random source fails.
pub fn generate_key(len: usize) -> Result<KeyMaterial> {
    generate_key_with(len, &mut OsRandom)
}

/// [`generate_key`] with an explicit random source.
pub fn generate_key_with<R>(len: usize, rng: &mut R) -> Result<KeyMaterial>
where
    R: RandomSource + ?Sized,
{
    if len == 0 {
        return Err(EnvelopeError::InvalidKeyLength { got: 0 });
    }
    let mut key = KeyMaterial::new(vec![0u8; len]);
    rng.try_fill(key.as_mut_bytes())?;
    debug!(len, "key generated");
    Ok(key)
}

/// Generate the largest key `algorithm` accepts (32 bytes for every
/// algorithm here: AES-256 or ChaCha20).
pub fn generate_key_for(algorithm: Algorithm) -> Result<KeyMaterial> {
    let len = algorithm.key_lengths().iter().copied().max().unwrap_or(32);
    generate_key(len)
}

/// Letters-only test fixture of `len` bytes. Not suitable as a key.
pub fn fixture_key(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())])
        .collect()
}
