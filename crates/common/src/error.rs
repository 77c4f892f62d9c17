//! Error taxonomy shared by the envelope library and the CLI.

use thiserror::Error;

/// Every failure an envelope operation can report.
///
/// Variants map to stable process exit codes used by the `envelope` binary:
/// - key and input problems ([`EnvelopeError::InvalidKeyLength`],
///   [`EnvelopeError::KeyEncoding`], [`EnvelopeError::Base64DecodeError`],
///   [`EnvelopeError::InvalidCiphertextLength`]) → 2
/// - integrity failures ([`EnvelopeError::AuthenticationFailed`],
///   [`EnvelopeError::InvalidPadding`]) → 3
/// - environment failures ([`EnvelopeError::RandomSourceError`],
///   [`EnvelopeError::SealFailed`], [`EnvelopeError::Rsa`]) → 4
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The key length is not accepted by the selected cipher.
    #[error("invalid key length: {got} bytes")]
    InvalidKeyLength { got: usize },

    /// The random source could not supply IV or nonce bytes.
    #[error("random source failure: {0}")]
    RandomSourceError(String),

    /// The envelope is shorter than its prefix, or the payload is not block-aligned.
    #[error("invalid ciphertext length: {got} bytes")]
    InvalidCiphertextLength { got: usize },

    /// AEAD tag verification failed. No plaintext is released.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The base64 transport encoding is malformed.
    #[error("base64 decode error: {0}")]
    Base64DecodeError(String),

    /// The AEAD refused to seal the input (plaintext beyond the construction's limit).
    #[error("aead seal failed")]
    SealFailed,

    /// PKCS#7 padding did not verify after decryption.
    #[error("invalid padding")]
    InvalidPadding,

    /// Key file or PEM block could not be decoded.
    #[error("key encoding error: {0}")]
    KeyEncoding(String),

    /// The RSA primitive reported a failure.
    #[error("rsa failure: {0}")]
    Rsa(String),
}

impl EnvelopeError {
    /// Short machine-readable code, safe to print or log.
    pub fn code(&self) -> &'static str {
        match self {
            EnvelopeError::InvalidKeyLength { .. } => "invalid_key_length",
            EnvelopeError::RandomSourceError(_) => "random_source",
            EnvelopeError::InvalidCiphertextLength { .. } => "invalid_ciphertext_length",
            EnvelopeError::AuthenticationFailed => "authentication_failed",
            EnvelopeError::SealFailed => "seal_failed",
            EnvelopeError::Base64DecodeError(_) => "base64_decode",
            EnvelopeError::InvalidPadding => "invalid_padding",
            EnvelopeError::KeyEncoding(_) => "key_encoding",
            EnvelopeError::Rsa(_) => "rsa",
        }
    }

    /// Process exit code the CLI returns for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EnvelopeError::InvalidKeyLength { .. }
            | EnvelopeError::KeyEncoding(_)
            | EnvelopeError::Base64DecodeError(_)
            | EnvelopeError::InvalidCiphertextLength { .. } => 2,
            EnvelopeError::AuthenticationFailed | EnvelopeError::InvalidPadding => 3,
            EnvelopeError::RandomSourceError(_)
            | EnvelopeError::SealFailed
            | EnvelopeError::Rsa(_) => 4,
        }
    }
}

/// Convenience alias used throughout the envelope crates.
pub type Result<T, E = EnvelopeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(EnvelopeError::InvalidKeyLength { got: 15 }.exit_code(), 2);
        assert_eq!(EnvelopeError::Base64DecodeError("x".into()).exit_code(), 2);
        assert_eq!(EnvelopeError::AuthenticationFailed.exit_code(), 3);
        assert_eq!(EnvelopeError::InvalidPadding.exit_code(), 3);
        assert_eq!(EnvelopeError::RandomSourceError("x".into()).exit_code(), 4);
    }

    #[test]
    fn display_includes_detail() {
        let e = EnvelopeError::InvalidKeyLength { got: 17 };
        assert!(e.to_string().contains("17"));
        let e = EnvelopeError::KeyEncoding("bad hex".into());
        assert!(e.to_string().contains("bad hex"));
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            EnvelopeError::InvalidKeyLength { got: 0 },
            EnvelopeError::RandomSourceError(String::new()),
            EnvelopeError::InvalidCiphertextLength { got: 0 },
            EnvelopeError::AuthenticationFailed,
            EnvelopeError::SealFailed,
            EnvelopeError::Base64DecodeError(String::new()),
            EnvelopeError::InvalidPadding,
            EnvelopeError::KeyEncoding(String::new()),
            EnvelopeError::Rsa(String::new()),
        ];
        let mut codes: Vec<_> = all.iter().map(EnvelopeError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
