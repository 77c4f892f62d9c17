//! ChaCha20-Poly1305 envelopes (32-byte key).
//!
//! [`seal`] / [`open`] use the framed format `nonce(12) || ciphertext || tag(16)`
//! with a fresh random nonce per call, the same shape as the GCM envelope.
//!
//! [`seal_fixed_nonce`] / [`open_fixed_nonce`] reproduce the legacy format:
//! `ciphertext || tag(16)` under an implicit all-zero nonce. Sealing two
//! different plaintexts under the same key with this path leaks their XOR and
//! lets an attacker forge tags. Use it only to exchange data with producers
//! that still emit the legacy format, with a key that is never reused.

use chacha20poly1305::ChaCha20Poly1305;
use common::protocol::CHACHA_NONCE_LEN;
use common::{EnvelopeError, Result};
use tracing::{trace, warn};

use super::aead::{open_framed, open_raw, seal_framed, seal_raw};
use super::random::{OsRandom, RandomSource};

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

const ZERO_NONCE: [u8; CHACHA_NONCE_LEN] = [0u8; CHACHA_NONCE_LEN];

fn check_key(key: &[u8]) -> Result<()> {
    if key.len() == KEY_LEN {
        Ok(())
    } else {
        Err(EnvelopeError::InvalidKeyLength { got: key.len() })
    }
}

/// Seal `plaintext`, returning `nonce || ciphertext || tag`.
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] unless `key` is exactly [`KEY_LEN`] bytes.
/// - [`EnvelopeError::RandomSourceError`] if the nonce cannot be generated.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    seal_with(plaintext, key, &mut OsRandom)
}

/// [`seal`] with an explicit nonce source.
pub fn seal_with<R>(plaintext: &[u8], key: &[u8], rng: &mut R) -> Result<Vec<u8>>
where
    R: RandomSource + ?Sized,
{
    check_key(key)?;
    let envelope = seal_framed::<ChaCha20Poly1305, R>(key, plaintext, rng)?;
    trace!(plaintext_len = plaintext.len(), envelope_len = envelope.len(), "chacha envelope sealed");
    Ok(envelope)
}

/// Open an envelope produced by [`seal`].
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] unless `key` is exactly [`KEY_LEN`] bytes.
/// - [`EnvelopeError::InvalidCiphertextLength`] if the envelope cannot hold a
///   nonce and a tag.
/// - [`EnvelopeError::AuthenticationFailed`] on any tag mismatch.
pub fn open(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;
    open_framed::<ChaCha20Poly1305>(key, envelope)
}

/// Seal under the all-zero nonce, returning `ciphertext || tag` (legacy format).
///
/// Deterministic: the same key and plaintext always give the same output.
pub fn seal_fixed_nonce(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;
    warn!("sealing with the fixed all-zero chacha20-poly1305 nonce");
    seal_raw::<ChaCha20Poly1305>(key, &ZERO_NONCE, plaintext)
}

/// Open a legacy `ciphertext || tag` envelope sealed under the all-zero nonce.
pub fn open_fixed_nonce(sealed: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;
    open_raw::<ChaCha20Poly1305>(key, &ZERO_NONCE, sealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::MockRandomSource;
    use crate::keys::fixture_key;
    use common::protocol::TAG_LEN;

    #[test]
    fn round_trip() {
        let key = fixture_key(KEY_LEN);
        let text = fixture_key(64);
        let envelope = seal(&text, &key).unwrap();
        assert_eq!(envelope.len(), CHACHA_NONCE_LEN + text.len() + TAG_LEN);
        assert_eq!(open(&envelope, &key).unwrap(), text);
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let key = fixture_key(KEY_LEN);
        let envelope = seal(b"", &key).unwrap();
        assert!(open(&envelope, &key).unwrap().is_empty());
    }

    #[test]
    fn framed_path_is_not_deterministic() {
        let key = fixture_key(KEY_LEN);
        assert_ne!(seal(b"same", &key).unwrap(), seal(b"same", &key).unwrap());
    }

    #[test]
    fn fixed_nonce_round_trip() {
        let key = fixture_key(KEY_LEN);
        let text = fixture_key(64);
        let sealed = seal_fixed_nonce(&text, &key).unwrap();
        assert_eq!(sealed.len(), text.len() + TAG_LEN);
        assert_eq!(open_fixed_nonce(&sealed, &key).unwrap(), text);
    }

    // Pins the legacy behaviour: identical inputs give identical envelopes.
    #[test]
    fn fixed_nonce_is_deterministic() {
        let key = fixture_key(KEY_LEN);
        let a = seal_fixed_nonce(b"repeat me", &key).unwrap();
        let b = seal_fixed_nonce(b"repeat me", &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_nonce_envelope_opens_in_framed_form() {
        let key = fixture_key(KEY_LEN);
        let sealed = seal_fixed_nonce(b"legacy", &key).unwrap();
        let mut framed = ZERO_NONCE.to_vec();
        framed.extend_from_slice(&sealed);
        assert_eq!(open(&framed, &key).unwrap(), b"legacy");
    }

    #[test]
    fn tampering_fails_authentication() {
        let key = fixture_key(KEY_LEN);
        let mut envelope = seal(b"payload", &key).unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert_eq!(open(&envelope, &key), Err(EnvelopeError::AuthenticationFailed));

        let mut sealed = seal_fixed_nonce(b"payload", &key).unwrap();
        sealed[0] ^= 0x80;
        assert_eq!(
            open_fixed_nonce(&sealed, &key),
            Err(EnvelopeError::AuthenticationFailed)
        );
    }

    #[test]
    fn rejects_every_non_32_byte_key() {
        for len in [0, 16, 24, 31, 33, 64] {
            let key = vec![7u8; len];
            let expected = Err(EnvelopeError::InvalidKeyLength { got: len });
            assert_eq!(seal(b"x", &key), expected);
            assert_eq!(open(&[0u8; 40], &key), expected);
            assert_eq!(seal_fixed_nonce(b"x", &key), expected);
            assert_eq!(open_fixed_nonce(&[0u8; 40], &key), expected);
        }
    }

    #[test]
    fn short_envelopes_rejected() {
        let key = fixture_key(KEY_LEN);
        assert_eq!(
            open(&[0u8; 20], &key),
            Err(EnvelopeError::InvalidCiphertextLength { got: 20 })
        );
        assert_eq!(
            open_fixed_nonce(&[0u8; 8], &key),
            Err(EnvelopeError::InvalidCiphertextLength { got: 8 })
        );
    }

    #[test]
    fn random_source_failure_propagates() {
        let mut rng = MockRandomSource::new();
        rng.expect_try_fill()
            .returning(|_| Err(EnvelopeError::RandomSourceError("gone".into())));
        assert_eq!(
            seal_with(b"x", &fixture_key(KEY_LEN), &mut rng),
            Err(EnvelopeError::RandomSourceError("gone".into()))
        );
    }
}
