//! Configuration loading and validation for the `envelope` CLI.
//!
//! Values come from `ENVELOPE_*` environment variables. Command-line flags
//! override them per invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use common::protocol::{Algorithm, Encoding};
use envelope::crypto::rsa_oaep::MIN_BITS;
use serde::Deserialize;

/// Validated CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Envelope algorithm used when `--algorithm` is not given.
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    /// Transport encoding used when `--encoding` is not given.
    #[serde(default)]
    pub encoding: Encoding,

    /// Hex key file used when `--key-file` is not given.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Modulus size for `rsa-keygen` when `--bits` is not given.
    #[serde(default = "default_rsa_bits")]
    pub rsa_bits: usize,

    /// Tracing log level. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_algorithm() -> Algorithm {
    Algorithm::AesGcm
}
fn default_rsa_bits() -> usize {
    2048
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix("ENVELOPE"))
    }

    fn load<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build envelope configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise envelope configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.rsa_bits < MIN_BITS {
            anyhow::bail!("ENVELOPE_RSA_BITS must be at least {MIN_BITS}, got {}", self.rsa_bits);
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("ENVELOPE_LOG_LEVEL must not be empty");
        }
        if let Some(path) = &self.key_file {
            if path.as_os_str().is_empty() {
                anyhow::bail!("ENVELOPE_KEY_FILE must not be empty when set");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        config::Environment::with_prefix("ENVELOPE").source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    fn valid() -> Config {
        Config {
            algorithm: Algorithm::AesGcm,
            encoding: Encoding::Raw,
            key_file: None,
            rsa_bits: 2048,
            log_level: "info".into(),
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(default_algorithm(), Algorithm::AesGcm);
        assert_eq!(default_rsa_bits(), 2048);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn load_uses_defaults_when_unset() {
        let cfg = Config::load(env(&[])).unwrap();
        assert_eq!(cfg.algorithm, Algorithm::AesGcm);
        assert_eq!(cfg.encoding, Encoding::Raw);
        assert!(cfg.key_file.is_none());
        assert_eq!(cfg.rsa_bits, 2048);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn load_reads_prefixed_variables() {
        let cfg = Config::load(env(&[
            ("ENVELOPE_ALGORITHM", "aes-cbc"),
            ("ENVELOPE_ENCODING", "base64"),
            ("ENVELOPE_KEY_FILE", "/run/secrets/key.hex"),
            ("ENVELOPE_RSA_BITS", "3072"),
            ("ENVELOPE_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.algorithm, Algorithm::AesCbc);
        assert_eq!(cfg.encoding, Encoding::Base64);
        assert_eq!(cfg.key_file, Some(PathBuf::from("/run/secrets/key.hex")));
        assert_eq!(cfg.rsa_bits, 3072);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn load_rejects_unknown_algorithm() {
        assert!(Config::load(env(&[("ENVELOPE_ALGORITHM", "des")])).is_err());
    }

    #[test]
    fn validate_rejects_small_rsa_modulus() {
        let cfg = Config {
            rsa_bits: 512,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            log_level: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_key_file() {
        let cfg = Config {
            key_file: Some(PathBuf::new()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }
}
