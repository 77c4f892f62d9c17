//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::protocol::{Algorithm, Encoding};

/// Seal and open symmetric envelopes.
#[derive(Debug, Parser)]
#[command(name = "envelope", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seal plaintext into an envelope.
    Encrypt(CipherArgs),
    /// Open an envelope back into plaintext.
    Decrypt(CipherArgs),
    /// Describe an envelope's layout as JSON without decrypting it.
    Inspect(InspectArgs),
    /// Generate a random symmetric key, written as hex.
    Keygen(KeygenArgs),
    /// Generate an RSA key pair as PEM files.
    RsaKeygen(RsaKeygenArgs),
    /// Encrypt a short message with RSA-OAEP (SHA-256).
    RsaEncrypt(RsaEncryptArgs),
    /// Decrypt an RSA-OAEP (SHA-256) ciphertext.
    RsaDecrypt(RsaDecryptArgs),
}

/// Input and output paths. Omitted paths mean stdin and stdout.
#[derive(Debug, Clone, Default, Args)]
pub struct IoArgs {
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CipherArgs {
    /// Overrides ENVELOPE_ALGORITHM.
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Overrides ENVELOPE_ENCODING.
    #[arg(short, long)]
    pub encoding: Option<Encoding>,

    /// Hex key file. Overrides ENVELOPE_KEY_FILE.
    #[arg(short, long)]
    pub key_file: Option<PathBuf>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    #[arg(short, long)]
    pub encoding: Option<Encoding>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Clone, Args)]
pub struct KeygenArgs {
    /// Key length in bytes. Defaults to the largest length the algorithm
    /// accepts (32).
    #[arg(short, long)]
    pub length: Option<usize>,

    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RsaKeygenArgs {
    /// Modulus size. Overrides ENVELOPE_RSA_BITS.
    #[arg(short, long)]
    pub bits: Option<usize>,

    #[arg(long)]
    pub private_out: PathBuf,

    #[arg(long)]
    pub public_out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct RsaEncryptArgs {
    /// PEM public key (SPKI or PKCS#1).
    #[arg(long)]
    pub public_key: PathBuf,

    #[arg(short, long)]
    pub encoding: Option<Encoding>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RsaDecryptArgs {
    /// PEM private key (PKCS#1 or PKCS#8).
    #[arg(long)]
    pub private_key: PathBuf,

    #[arg(short, long)]
    pub encoding: Option<Encoding>,

    #[command(flatten)]
    pub io: IoArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encrypt_flags() {
        let cli = Cli::try_parse_from([
            "envelope", "encrypt", "--algorithm", "aes-ctr", "--encoding", "base64", "--key-file",
            "k.hex", "--input", "in.bin",
        ])
        .unwrap();
        let Command::Encrypt(args) = cli.command else {
            panic!("expected encrypt");
        };
        assert_eq!(args.algorithm, Some(Algorithm::AesCtr));
        assert_eq!(args.encoding, Some(Encoding::Base64));
        assert_eq!(args.key_file, Some(PathBuf::from("k.hex")));
        assert_eq!(args.io.input, Some(PathBuf::from("in.bin")));
        assert!(args.io.output.is_none());
    }

    #[test]
    fn rejects_unknown_algorithm() {
        assert!(Cli::try_parse_from(["envelope", "encrypt", "--algorithm", "rot13"]).is_err());
    }

    #[test]
    fn rsa_keygen_requires_output_paths() {
        assert!(Cli::try_parse_from(["envelope", "rsa-keygen"]).is_err());
        let cli = Cli::try_parse_from([
            "envelope", "rsa-keygen", "--bits", "1024", "--private-out", "a.pem", "--public-out",
            "b.pem",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::RsaKeygen(RsaKeygenArgs { bits: Some(1024), .. })));
    }
}
