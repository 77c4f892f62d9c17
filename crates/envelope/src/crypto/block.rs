//! AES block-cipher envelopes: CBC, CTR, OFB, and CFB.
//!
//! Envelope format: `IV(16) || ciphertext`, where the plaintext is PKCS#7
//! padded before encryption in every mode. The stream-like modes are padded
//! too, so ciphertext length is always a multiple of the block size and one
//! checked unpad step serves all four modes.
//!
//! **No authentication.** A corrupted envelope decrypts to garbage (or fails
//! the padding check); it is never reported as tampered. Use
//! [`super::gcm`] or [`super::chacha`] when integrity matters.
//!
//! Mode details:
//! - CTR uses the whole 16-byte IV as a big-endian 128-bit counter.
//! - CFB is full-block (128-bit segment) feedback.

use aes::cipher::{AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::block_padding::NoPadding;
use common::protocol::{BlockMode, BLOCK_SIZE};
use common::{EnvelopeError, Result};
use tracing::trace;

use super::padding::{pad, unpad};
use super::random::{random_array, OsRandom, RandomSource};

/// AES key lengths in bytes: AES-128, AES-192, AES-256.
pub const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// Bind `$cipher` to the AES variant selected by the key length and evaluate
/// `$body`, or return [`EnvelopeError::InvalidKeyLength`].
macro_rules! with_aes {
    ($key:expr, $cipher:ident => $body:block) => {
        match $key.len() {
            16 => {
                type $cipher = Aes128;
                $body
            }
            24 => {
                type $cipher = Aes192;
                $body
            }
            32 => {
                type $cipher = Aes256;
                $body
            }
            got => Err(EnvelopeError::InvalidKeyLength { got }),
        }
    };
}

fn check_key(key: &[u8]) -> Result<()> {
    if KEY_LENGTHS.contains(&key.len()) {
        Ok(())
    } else {
        Err(EnvelopeError::InvalidKeyLength { got: key.len() })
    }
}

/// Run `mode` over `buf` in place. `buf` must be block-aligned.
fn apply(direction: Direction, mode: BlockMode, key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
    let bad_key = |_| EnvelopeError::InvalidKeyLength { got: key.len() };
    let len = buf.len();

    with_aes!(key, C => {
        match (mode, direction) {
            (BlockMode::Cbc, Direction::Encrypt) => {
                cbc::Encryptor::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .encrypt_padded_mut::<NoPadding>(buf, len)
                    .map_err(|_| EnvelopeError::InvalidCiphertextLength { got: len })?;
            }
            (BlockMode::Cbc, Direction::Decrypt) => {
                cbc::Decryptor::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .decrypt_padded_mut::<NoPadding>(buf)
                    .map_err(|_| EnvelopeError::InvalidCiphertextLength { got: len })?;
            }
            // CTR and OFB are keystream XORs: the same call runs both ways.
            (BlockMode::Ctr, _) => {
                ctr::Ctr128BE::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .apply_keystream(buf);
            }
            (BlockMode::Ofb, _) => {
                ofb::Ofb::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .apply_keystream(buf);
            }
            (BlockMode::Cfb, Direction::Encrypt) => {
                cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .encrypt(buf);
            }
            (BlockMode::Cfb, Direction::Decrypt) => {
                cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
                    .map_err(bad_key)?
                    .decrypt(buf);
            }
        }
        Ok(())
    })
}

/// Encrypt `plaintext` under `mode`, returning `IV || ciphertext`.
///
/// The IV is drawn fresh from the OS CSPRNG on every call.
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] if `key` is not 16, 24, or 32 bytes.
/// - [`EnvelopeError::RandomSourceError`] if the IV cannot be generated.
pub fn encrypt(mode: BlockMode, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    encrypt_with(mode, plaintext, key, &mut OsRandom)
}

/// [`encrypt`] with an explicit IV source.
pub fn encrypt_with<R>(mode: BlockMode, plaintext: &[u8], key: &[u8], rng: &mut R) -> Result<Vec<u8>>
where
    R: RandomSource + ?Sized,
{
    check_key(key)?;
    let iv: [u8; BLOCK_SIZE] = random_array(rng)?;

    let mut body = pad(plaintext, BLOCK_SIZE);
    apply(Direction::Encrypt, mode, key, &iv, &mut body)?;

    let mut envelope = Vec::with_capacity(BLOCK_SIZE + body.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&body);

    trace!(%mode, plaintext_len = plaintext.len(), envelope_len = envelope.len(), "block envelope sealed");
    Ok(envelope)
}

/// Decrypt an `IV || ciphertext` envelope produced by [`encrypt`].
///
/// # Errors
///
/// - [`EnvelopeError::InvalidKeyLength`] if `key` is not 16, 24, or 32 bytes.
/// - [`EnvelopeError::InvalidCiphertextLength`] if the envelope is shorter than
///   one IV or the ciphertext is not block-aligned.
/// - [`EnvelopeError::InvalidPadding`] if the decrypted padding does not verify.
///   This is not an authentication failure; wrong keys and corrupted input
///   usually land here but may also yield garbage plaintext.
pub fn decrypt(mode: BlockMode, envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key(key)?;
    if envelope.len() < BLOCK_SIZE {
        return Err(EnvelopeError::InvalidCiphertextLength { got: envelope.len() });
    }

    let (iv, ciphertext) = envelope.split_at(BLOCK_SIZE);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(EnvelopeError::InvalidCiphertextLength { got: ciphertext.len() });
    }

    let mut plaintext = ciphertext.to_vec();
    apply(Direction::Decrypt, mode, key, iv, &mut plaintext)?;
    let len = unpad(&plaintext, BLOCK_SIZE)?.len();
    plaintext.truncate(len);

    trace!(%mode, envelope_len = envelope.len(), plaintext_len = len, "block envelope opened");
    Ok(plaintext)
}

/// AES-CBC envelope, standard base64 encoded.
pub fn encrypt_cbc_base64(plaintext: &[u8], key: &[u8]) -> Result<String> {
    let envelope = encrypt(BlockMode::Cbc, plaintext, key)?;
    Ok(STANDARD.encode(envelope))
}

/// Decode a standard base64 AES-CBC envelope and decrypt it.
///
/// # Errors
///
/// Returns [`EnvelopeError::Base64DecodeError`] before touching the cipher if
/// `text` is not valid base64; otherwise as [`decrypt`].
pub fn decrypt_cbc_base64(text: &str, key: &[u8]) -> Result<Vec<u8>> {
    let envelope = super::decode_base64(text.as_bytes())?;
    decrypt(BlockMode::Cbc, &envelope, key)
}
