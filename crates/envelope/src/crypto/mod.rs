//! Symmetric cipher envelopes and their supporting primitives.
//!
//! This module is free of I/O: every function takes bytes and a key and
//! returns bytes or an [`EnvelopeError`]. Nothing is logged above `debug`,
//! and no key or plaintext bytes ever reach a log event.
//!
//! # Envelope formats
//!
//! ```text
//! aes-cbc | aes-ctr | aes-ofb | aes-cfb   IV(16) || ciphertext (block-aligned)
//! aes-gcm | chacha20-poly1305             nonce(12) || ciphertext || tag(16)
//! chacha20-poly1305-fixed-nonce           ciphertext || tag(16)
//! ```
//!
//! Envelopes do not name their algorithm; the caller must know it.

mod aead;
pub mod block;
pub mod chacha;
pub mod gcm;
pub mod padding;
pub mod random;
pub mod rsa_oaep;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::{Algorithm, Encoding, EnvelopeReport, BLOCK_SIZE};
use common::{EnvelopeError, Result};
use tracing::debug;

pub use random::{OsRandom, RandomSource};

/// Seal `plaintext` under `algorithm`.
pub fn seal(algorithm: Algorithm, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    seal_with(algorithm, plaintext, key, &mut OsRandom)
}

/// [`seal`] with an explicit IV / nonce source.
pub fn seal_with<R>(algorithm: Algorithm, plaintext: &[u8], key: &[u8], rng: &mut R) -> Result<Vec<u8>>
where
    R: RandomSource + ?Sized,
{
    debug!(%algorithm, plaintext_len = plaintext.len(), "sealing");
    match algorithm.block_mode() {
        Some(mode) => block::encrypt_with(mode, plaintext, key, rng),
        None => match algorithm {
            Algorithm::AesGcm => gcm::seal_with(plaintext, key, rng),
            Algorithm::ChaCha20Poly1305FixedNonce => chacha::seal_fixed_nonce(plaintext, key),
            _ => chacha::seal_with(plaintext, key, rng),
        },
    }
}

/// Open an envelope sealed under `algorithm`.
pub fn open(algorithm: Algorithm, envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    debug!(%algorithm, envelope_len = envelope.len(), "opening");
    match algorithm.block_mode() {
        Some(mode) => block::decrypt(mode, envelope, key),
        None => match algorithm {
            Algorithm::AesGcm => gcm::open(envelope, key),
            Algorithm::ChaCha20Poly1305FixedNonce => chacha::open_fixed_nonce(envelope, key),
            _ => chacha::open(envelope, key),
        },
    }
}

/// Apply the transport encoding to raw envelope bytes.
pub fn encode(encoding: Encoding, envelope: &[u8]) -> Vec<u8> {
    match encoding {
        Encoding::Raw => envelope.to_vec(),
        Encoding::Base64 => STANDARD.encode(envelope).into_bytes(),
    }
}

/// Undo [`encode`].
pub fn decode(encoding: Encoding, input: &[u8]) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Raw => Ok(input.to_vec()),
        Encoding::Base64 => decode_base64(input),
    }
}

/// Strict standard-alphabet base64 decode. Line breaks are ignored so that
/// wrapped or newline-terminated text decodes.
pub(crate) fn decode_base64(input: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| *b != b'\n' && *b != b'\r')
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| EnvelopeError::Base64DecodeError(e.to_string()))
}

/// Describe how `envelope` splits into prefix, ciphertext, and tag under
/// `algorithm`, without decrypting it.
pub fn inspect(algorithm: Algorithm, envelope: &[u8]) -> EnvelopeReport {
    let layout = algorithm.layout();
    let total_len = envelope.len();
    let prefix_len = layout.prefix_len.min(total_len);
    let tag_len = if total_len >= layout.prefix_len + layout.tag_len {
        layout.tag_len
    } else {
        0
    };
    let ciphertext_len = total_len - prefix_len - tag_len;

    let well_formed = total_len >= layout.min_len()
        && (!layout.block_aligned || ciphertext_len % BLOCK_SIZE == 0);
    let prefix_hex = (layout.prefix_len > 0 && total_len >= layout.prefix_len)
        .then(|| hex::encode(&envelope[..layout.prefix_len]));

    EnvelopeReport {
        algorithm,
        total_len,
        prefix_len,
        ciphertext_len,
        tag_len,
        prefix_hex,
        well_formed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::fixture_key;

    #[test]
    fn dispatch_round_trips_every_algorithm() {
        for algorithm in Algorithm::ALL {
            let key = fixture_key(32);
            let envelope = seal(algorithm, b"dispatch me", &key).unwrap();
            assert_eq!(envelope.len(), inspect(algorithm, &envelope).total_len);
            assert!(inspect(algorithm, &envelope).well_formed, "{algorithm}");
            assert_eq!(open(algorithm, &envelope, &key).unwrap(), b"dispatch me");
        }
    }

    #[test]
    fn envelopes_are_not_interchangeable() {
        let key = fixture_key(32);
        let envelope = seal(Algorithm::AesGcm, b"gcm only", &key).unwrap();
        assert!(open(Algorithm::ChaCha20Poly1305, &envelope, &key).is_err());
    }

    #[test]
    fn encoding_round_trip() {
        let raw = [0u8, 1, 2, 250, 251, 252];
        for encoding in [Encoding::Raw, Encoding::Base64] {
            let encoded = encode(encoding, &raw);
            assert_eq!(decode(encoding, &encoded).unwrap(), raw);
        }
        assert_eq!(encode(Encoding::Base64, b"hi"), b"aGk=");
    }

    #[test]
    fn base64_ignores_line_breaks() {
        assert_eq!(decode(Encoding::Base64, b"aGk=\r\n").unwrap(), b"hi");
        assert!(matches!(
            decode(Encoding::Base64, b"aGk"),
            Err(EnvelopeError::Base64DecodeError(_))
        ));
    }

    #[test]
    fn inspect_block_envelope() {
        let envelope = vec![0xAAu8; 48];
        let report = inspect(Algorithm::AesCbc, &envelope);
        assert_eq!(report.prefix_len, 16);
        assert_eq!(report.ciphertext_len, 32);
        assert_eq!(report.tag_len, 0);
        assert_eq!(report.prefix_hex.as_deref(), Some("aa".repeat(16).as_str()));
        assert!(report.well_formed);

        assert!(!inspect(Algorithm::AesCbc, &envelope[..40]).well_formed);
    }

    #[test]
    fn inspect_short_and_nonce_less_envelopes() {
        let report = inspect(Algorithm::AesGcm, &[0u8; 5]);
        assert_eq!(report.prefix_len, 5);
        assert_eq!(report.ciphertext_len, 0);
        assert_eq!(report.prefix_hex, None);
        assert!(!report.well_formed);

        let report = inspect(Algorithm::ChaCha20Poly1305FixedNonce, &[0u8; 20]);
        assert_eq!(report.prefix_len, 0);
        assert_eq!(report.ciphertext_len, 4);
        assert_eq!(report.tag_len, 16);
        assert!(report.prefix_hex.is_none());
        assert!(report.well_formed);
    }
}
