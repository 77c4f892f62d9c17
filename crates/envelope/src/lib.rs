//! IV/nonce-framed symmetric envelopes over AES and ChaCha20-Poly1305.
//!
//! ```text
//! block modes   IV(16)    || ciphertext (PKCS#7 padded)
//! aead          nonce(12) || ciphertext || tag(16)
//! ```
//!
//! Every call is stateless and independent; the only shared resource is the
//! OS random source. See [`crypto`] for the envelope layer and [`keys`] for
//! key generation.

pub mod crypto;
pub mod keys;

pub use common::protocol::{Algorithm, BlockMode, Encoding, EnvelopeReport};
pub use common::{EnvelopeError, Result};
pub use crypto::{decode, encode, inspect, open, seal};
pub use keys::{generate_key, KeyMaterial};
