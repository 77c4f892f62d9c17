//! AES-GCM envelopes.
//!
//! Envelope format: `nonce(12) || ciphertext || tag(16)`. The tag is appended
//! by the AEAD seal itself. A fresh random nonce is drawn for every call, so
//! the same plaintext never produces the same envelope twice.

use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{EnvelopeError, Result};
use tracing::trace;

use super::aead::{open_framed, seal_framed};
use super::random::{OsRandom, RandomSource};

/// AES-192-GCM with the standard 96-bit nonce.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Seal `plaintext` with AES-GCM (key of 16, 24, or 32 bytes).
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] for any other key length.
/// - [`EnvelopeError::RandomSourceError`] if the nonce cannot be generated.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    seal_with(plaintext, key, &mut OsRandom)
}

/// [`seal`] with an explicit nonce source.
pub fn seal_with<R>(plaintext: &[u8], key: &[u8], rng: &mut R) -> Result<Vec<u8>>
where
    R: RandomSource + ?Sized,
{
    let envelope = match key.len() {
        16 => seal_framed::<Aes128Gcm, R>(key, plaintext, rng),
        24 => seal_framed::<Aes192Gcm, R>(key, plaintext, rng),
        32 => seal_framed::<Aes256Gcm, R>(key, plaintext, rng),
        got => Err(EnvelopeError::InvalidKeyLength { got }),
    }?;
    trace!(plaintext_len = plaintext.len(), envelope_len = envelope.len(), "gcm envelope sealed");
    Ok(envelope)
}

/// Open an envelope produced by [`seal`].
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] if `key` is not 16, 24, or 32 bytes.
/// - [`EnvelopeError::InvalidCiphertextLength`] if the envelope cannot hold a
///   nonce and a tag.
/// - [`EnvelopeError::AuthenticationFailed`] on a wrong key, wrong nonce, or any
///   modification of the envelope.
pub fn open(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    match key.len() {
        16 => open_framed::<Aes128Gcm>(key, envelope),
        24 => open_framed::<Aes192Gcm>(key, envelope),
        32 => open_framed::<Aes256Gcm>(key, envelope),
        got => Err(EnvelopeError::InvalidKeyLength { got }),
    }
}

/// [`seal`], standard base64 encoded.
pub fn seal_base64(plaintext: &[u8], key: &[u8]) -> Result<String> {
    Ok(STANDARD.encode(seal(plaintext, key)?))
}

/// Decode a standard base64 envelope and [`open`] it.
pub fn open_base64(text: &str, key: &[u8]) -> Result<Vec<u8>> {
    let envelope = super::decode_base64(text.as_bytes())?;
    open(&envelope, key)
}
