//! Subcommand handlers.
//!
//! Each handler resolves its settings (flag first, then [`Config`]), reads
//! its input, calls into the `envelope` library, and writes the result.
//! Log events carry algorithm names and lengths only.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use common::protocol::Encoding;
use envelope::crypto::{self, rsa_oaep};
use envelope::keys::{self, KeyMaterial};
use tracing::info;

use crate::cli::{
    CipherArgs, Command, InspectArgs, KeygenArgs, RsaDecryptArgs, RsaEncryptArgs, RsaKeygenArgs,
};
use crate::config::Config;

/// Dispatch one parsed subcommand.
pub fn run(command: Command, cfg: &Config) -> Result<()> {
    match command {
        Command::Encrypt(args) => encrypt(&args, cfg),
        Command::Decrypt(args) => decrypt(&args, cfg),
        Command::Inspect(args) => inspect(&args, cfg),
        Command::Keygen(args) => keygen(&args, cfg),
        Command::RsaKeygen(args) => rsa_keygen(&args, cfg),
        Command::RsaEncrypt(args) => rsa_encrypt(&args, cfg),
        Command::RsaDecrypt(args) => rsa_decrypt(&args, cfg),
    }
}

fn encrypt(args: &CipherArgs, cfg: &Config) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(cfg.algorithm);
    let encoding = args.encoding.unwrap_or(cfg.encoding);
    let key = load_key(args.key_file.as_deref(), cfg)?;
    let plaintext = read_input(args.io.input.as_deref())?;

    let envelope = crypto::seal(algorithm, &plaintext, key.as_bytes())
        .with_context(|| format!("{algorithm} encryption failed"))?;
    write_output(args.io.output.as_deref(), &encode(encoding, &envelope))?;

    info!(
        %algorithm,
        %encoding,
        plaintext_len = plaintext.len(),
        envelope_len = envelope.len(),
        "encrypted"
    );
    Ok(())
}

fn decrypt(args: &CipherArgs, cfg: &Config) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(cfg.algorithm);
    let encoding = args.encoding.unwrap_or(cfg.encoding);
    let key = load_key(args.key_file.as_deref(), cfg)?;
    let input = read_input(args.io.input.as_deref())?;

    let envelope = crypto::decode(encoding, &input).context("envelope decoding failed")?;
    let plaintext = crypto::open(algorithm, &envelope, key.as_bytes())
        .with_context(|| format!("{algorithm} decryption failed"))?;
    write_output(args.io.output.as_deref(), &plaintext)?;

    info!(
        %algorithm,
        %encoding,
        envelope_len = envelope.len(),
        plaintext_len = plaintext.len(),
        "decrypted"
    );
    Ok(())
}

fn inspect(args: &InspectArgs, cfg: &Config) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(cfg.algorithm);
    let encoding = args.encoding.unwrap_or(cfg.encoding);
    let input = read_input(args.io.input.as_deref())?;

    let envelope = crypto::decode(encoding, &input).context("envelope decoding failed")?;
    let report = crypto::inspect(algorithm, &envelope);
    let mut json = serde_json::to_vec_pretty(&report).context("failed to serialise report")?;
    json.push(b'\n');
    write_output(args.io.output.as_deref(), &json)
}

fn keygen(args: &KeygenArgs, cfg: &Config) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(cfg.algorithm);
    let key = match args.length {
        Some(len) => keys::generate_key(len)?,
        None => keys::generate_key_for(algorithm)?,
    };

    let mut text = key.to_hex().as_bytes().to_vec();
    text.push(b'\n');
    match &args.output {
        Some(path) => write_secret_file(path, &text)?,
        None => write_output(None, &text)?,
    }

    info!(%algorithm, len = key.len(), "key generated");
    Ok(())
}

fn rsa_keygen(args: &RsaKeygenArgs, cfg: &Config) -> Result<()> {
    let bits = args.bits.unwrap_or(cfg.rsa_bits);
    let pair = rsa_oaep::generate_keypair(bits)?;

    write_secret_file(&args.private_out, pair.private_pem.as_bytes())?;
    fs::write(&args.public_out, pair.public_pem.as_bytes())
        .with_context(|| format!("failed to write {}", args.public_out.display()))?;

    info!(
        bits,
        private_out = %args.private_out.display(),
        public_out = %args.public_out.display(),
        "rsa key pair generated"
    );
    Ok(())
}

fn rsa_encrypt(args: &RsaEncryptArgs, cfg: &Config) -> Result<()> {
    let encoding = args.encoding.unwrap_or(cfg.encoding);
    let public_pem = read_text(&args.public_key)?;
    let plaintext = read_input(args.io.input.as_deref())?;

    let ciphertext = rsa_oaep::encrypt_oaep(&plaintext, &public_pem)?;
    write_output(args.io.output.as_deref(), &encode(encoding, &ciphertext))?;

    info!(%encoding, ciphertext_len = ciphertext.len(), "rsa-oaep encrypted");
    Ok(())
}

fn rsa_decrypt(args: &RsaDecryptArgs, cfg: &Config) -> Result<()> {
    let encoding = args.encoding.unwrap_or(cfg.encoding);
    let private_pem = read_text(&args.private_key)?;
    let input = read_input(args.io.input.as_deref())?;

    let ciphertext = crypto::decode(encoding, &input).context("ciphertext decoding failed")?;
    let plaintext = rsa_oaep::decrypt_oaep(&ciphertext, &private_pem)?;
    write_output(args.io.output.as_deref(), &plaintext)?;

    info!(%encoding, plaintext_len = plaintext.len(), "rsa-oaep decrypted");
    Ok(())
}

// ---------------------------------------------------------------------------
// I/O helpers
// ---------------------------------------------------------------------------

/// Base64 output ends with a newline so it prints cleanly on a terminal.
fn encode(encoding: Encoding, bytes: &[u8]) -> Vec<u8> {
    let mut out = crypto::encode(encoding, bytes);
    if encoding == Encoding::Base64 {
        out.push(b'\n');
    }
    out
}

fn load_key(flag: Option<&Path>, cfg: &Config) -> Result<KeyMaterial> {
    let path: PathBuf = flag
        .map(Path::to_path_buf)
        .or_else(|| cfg.key_file.clone())
        .context("no key file: pass --key-file or set ENVELOPE_KEY_FILE")?;
    let text = read_text(&path)?;
    KeyMaterial::from_hex(&text).with_context(|| format!("invalid key file {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

/// Write key material readable by the owner only.
fn write_secret_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))
}
