//! Nonce-framed seal/open shared by the GCM and ChaCha20-Poly1305 envelopes.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use common::protocol::TAG_LEN;
use common::{EnvelopeError, Result};

use super::random::{random_array, RandomSource};

/// Nonce length of every AEAD used here.
pub(crate) const NONCE_LEN: usize = 12;

fn build<A: KeyInit>(key: &[u8]) -> Result<A> {
    A::new_from_slice(key).map_err(|_| EnvelopeError::InvalidKeyLength { got: key.len() })
}

/// Seal under an explicit nonce, returning `ciphertext || tag`.
pub(crate) fn seal_raw<A>(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    build::<A>(key)?
        .encrypt(GenericArray::from_slice(nonce), plaintext)
        .map_err(|_| EnvelopeError::SealFailed)
}

/// Open `ciphertext || tag` under an explicit nonce.
pub(crate) fn open_raw<A>(key: &[u8], nonce: &[u8; NONCE_LEN], sealed: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    let cipher = build::<A>(key)?;
    if sealed.len() < TAG_LEN {
        return Err(EnvelopeError::InvalidCiphertextLength { got: sealed.len() });
    }
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|_| EnvelopeError::AuthenticationFailed)
}

/// Seal with a fresh random nonce, returning `nonce || ciphertext || tag`.
pub(crate) fn seal_framed<A, R>(key: &[u8], plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12> + KeyInit,
    R: RandomSource + ?Sized,
{
    let cipher = build::<A>(key)?;
    let nonce: [u8; NONCE_LEN] = random_array(rng)?;
    let sealed = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| EnvelopeError::SealFailed)?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + sealed.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&sealed);
    Ok(envelope)
}

/// Split `nonce || ciphertext || tag` and open it.
pub(crate) fn open_framed<A>(key: &[u8], envelope: &[u8]) -> Result<Vec<u8>>
where
    A: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    let cipher = build::<A>(key)?;
    if envelope.len() < NONCE_LEN + TAG_LEN {
        return Err(EnvelopeError::InvalidCiphertextLength { got: envelope.len() });
    }
    let (nonce, sealed) = envelope.split_at(NONCE_LEN);
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|_| EnvelopeError::AuthenticationFailed)
}
