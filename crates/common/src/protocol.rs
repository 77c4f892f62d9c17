//! Algorithm identifiers and wire-layout descriptors.
//!
//! Envelopes are not self-describing: the prefix length of an envelope is
//! implied by the algorithm that produced it. The types here are the single
//! source of truth for those lengths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cipher block size shared by every AES mode, in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES-GCM nonce length (96 bits).
pub const GCM_NONCE_LEN: usize = 12;

/// ChaCha20-Poly1305 nonce length (96 bits).
pub const CHACHA_NONCE_LEN: usize = 12;

/// Authentication tag length for both AEAD constructions.
pub const TAG_LEN: usize = 16;

/// Returned when an identifier string does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownIdentifier {
    kind: &'static str,
    value: String,
}

// ---------------------------------------------------------------------------
// Block modes
// ---------------------------------------------------------------------------

/// Chaining mode for the block-cipher envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockMode {
    Cbc,
    Ctr,
    Ofb,
    Cfb,
}

impl BlockMode {
    /// Every supported mode, in a stable order.
    pub const ALL: [BlockMode; 4] = [BlockMode::Cbc, BlockMode::Ctr, BlockMode::Ofb, BlockMode::Cfb];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockMode::Cbc => "cbc",
            BlockMode::Ctr => "ctr",
            BlockMode::Ofb => "ofb",
            BlockMode::Cfb => "cfb",
        }
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockMode {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIdentifier {
                kind: "block mode",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Every envelope algorithm the toolkit can seal and open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "aes-cbc")]
    AesCbc,
    #[serde(rename = "aes-ctr")]
    AesCtr,
    #[serde(rename = "aes-ofb")]
    AesOfb,
    #[serde(rename = "aes-cfb")]
    AesCfb,
    #[serde(rename = "aes-gcm")]
    AesGcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
    /// All-zero nonce, no nonce framing. Reads and writes envelopes from
    /// older producers; never use it for new data.
    #[serde(rename = "chacha20-poly1305-fixed-nonce")]
    ChaCha20Poly1305FixedNonce,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::AesCbc,
        Algorithm::AesCtr,
        Algorithm::AesOfb,
        Algorithm::AesCfb,
        Algorithm::AesGcm,
        Algorithm::ChaCha20Poly1305,
        Algorithm::ChaCha20Poly1305FixedNonce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AesCbc => "aes-cbc",
            Algorithm::AesCtr => "aes-ctr",
            Algorithm::AesOfb => "aes-ofb",
            Algorithm::AesCfb => "aes-cfb",
            Algorithm::AesGcm => "aes-gcm",
            Algorithm::ChaCha20Poly1305 => "chacha20-poly1305",
            Algorithm::ChaCha20Poly1305FixedNonce => "chacha20-poly1305-fixed-nonce",
        }
    }

    /// The block mode behind this algorithm, if it is a block-cipher envelope.
    pub fn block_mode(self) -> Option<BlockMode> {
        match self {
            Algorithm::AesCbc => Some(BlockMode::Cbc),
            Algorithm::AesCtr => Some(BlockMode::Ctr),
            Algorithm::AesOfb => Some(BlockMode::Ofb),
            Algorithm::AesCfb => Some(BlockMode::Cfb),
            _ => None,
        }
    }

    /// Key lengths (in bytes) the algorithm accepts.
    pub fn key_lengths(self) -> &'static [usize] {
        match self {
            Algorithm::ChaCha20Poly1305 | Algorithm::ChaCha20Poly1305FixedNonce => &[32],
            _ => &[16, 24, 32],
        }
    }

    /// How the envelope bytes are laid out for this algorithm.
    pub fn layout(self) -> EnvelopeLayout {
        match self {
            Algorithm::AesCbc | Algorithm::AesCtr | Algorithm::AesOfb | Algorithm::AesCfb => {
                EnvelopeLayout {
                    prefix_len: BLOCK_SIZE,
                    tag_len: 0,
                    block_aligned: true,
                }
            }
            Algorithm::AesGcm => EnvelopeLayout {
                prefix_len: GCM_NONCE_LEN,
                tag_len: TAG_LEN,
                block_aligned: false,
            },
            Algorithm::ChaCha20Poly1305 => EnvelopeLayout {
                prefix_len: CHACHA_NONCE_LEN,
                tag_len: TAG_LEN,
                block_aligned: false,
            },
            Algorithm::ChaCha20Poly1305FixedNonce => EnvelopeLayout {
                prefix_len: 0,
                tag_len: TAG_LEN,
                block_aligned: false,
            },
        }
    }

    /// Whether opening the envelope verifies an authentication tag.
    pub fn is_authenticated(self) -> bool {
        self.layout().tag_len > 0
    }
}

impl From<BlockMode> for Algorithm {
    fn from(mode: BlockMode) -> Self {
        match mode {
            BlockMode::Cbc => Algorithm::AesCbc,
            BlockMode::Ctr => Algorithm::AesCtr,
            BlockMode::Ofb => Algorithm::AesOfb,
            BlockMode::Cfb => Algorithm::AesCfb,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIdentifier {
                kind: "algorithm",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Transport encoding
// ---------------------------------------------------------------------------

/// Transport encoding applied on top of the raw envelope bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Raw bytes.
    #[default]
    Raw,
    /// Standard-alphabet base64 with padding.
    Base64,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Raw => "raw",
            Encoding::Base64 => "base64",
        })
    }
}

impl FromStr for Encoding {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Encoding::Raw),
            "base64" => Ok(Encoding::Base64),
            _ => Err(UnknownIdentifier {
                kind: "encoding",
                value: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout and reports
// ---------------------------------------------------------------------------

/// Byte layout of an envelope: `prefix || ciphertext || tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeLayout {
    /// Length of the IV / nonce prefix (0 when the nonce is implicit).
    pub prefix_len: usize,
    /// Length of the trailing authentication tag (0 for block modes).
    pub tag_len: usize,
    /// Whether the ciphertext must be a multiple of [`BLOCK_SIZE`].
    pub block_aligned: bool,
}

impl EnvelopeLayout {
    /// Smallest envelope that can possibly open.
    pub fn min_len(&self) -> usize {
        if self.block_aligned {
            self.prefix_len + BLOCK_SIZE
        } else {
            self.prefix_len + self.tag_len
        }
    }
}

/// Structural description of an envelope, produced without decrypting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeReport {
    pub algorithm: Algorithm,
    pub total_len: usize,
    pub prefix_len: usize,
    pub ciphertext_len: usize,
    pub tag_len: usize,
    /// Hex of the IV / nonce prefix; `None` when the nonce is implicit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_hex: Option<String>,
    /// Whether the lengths are consistent with what the algorithm produces.
    pub well_formed: bool,
}
