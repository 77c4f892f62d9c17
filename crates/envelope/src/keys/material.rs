//! [`KeyMaterial`]: owned key bytes that never print and are wiped on drop.

use common::protocol::Algorithm;
use common::{EnvelopeError, Result};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Owned symmetric key bytes.
///
/// The buffer is overwritten with zeroes when dropped, and `Debug` never
/// shows the contents. Borrow the raw bytes with [`KeyMaterial::as_bytes`]
/// only for the duration of a cipher call.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Take ownership of `bytes`.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a hex-encoded key. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::KeyEncoding`] if `text` is not valid hex.
    pub fn from_hex(text: &str) -> Result<Self> {
        hex::decode(text.trim())
            .map(Self)
            .map_err(|e| EnvelopeError::KeyEncoding(format!("invalid hex key: {e}")))
    }

    /// Lower-case hex of the key. The returned string is wiped on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.0))
    }

    /// Check that this key fits `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyLength`] if the length is not one the
    /// algorithm accepts.
    pub fn check_for(&self, algorithm: Algorithm) -> Result<()> {
        if algorithm.key_lengths().contains(&self.len()) {
            Ok(())
        } else {
            Err(EnvelopeError::InvalidKeyLength { got: self.len() })
        }
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        write!(f, "KeyMaterial({} bytes, [REDACTED])", self.0.len())
    }
}
