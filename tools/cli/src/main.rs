//! sealkit CLI - Command line interface for encryption and hashing.
//!
//! This tool is a thin caller of the crypto core: it reads inputs, resolves
//! key material and prints base64 output. All logging happens here.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use sealkit_common::util::{
    base64_decode, base64_encode, read_to_end_bounded, truncate_for_log, MAX_READ_LIMIT,
};
use sealkit_common::{SensitiveBytes, TextEncoding};
use sealkit_crypto::{
    decrypt, derive_key_stretched, derive_key_with, digest, encrypt, CryptoConfig,
    HashAlgorithm, KdfParams, KdfScheme, Salt, SymmetricAlgorithm,
};

/// Environment variable consulted for the phrase when `--phrase-env` is not given.
const PHRASE_ENV: &str = "SEALKIT_PHRASE";

#[derive(Parser)]
#[command(name = "sealkit")]
#[command(about = "sealkit - Symmetric encryption and hashing")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file (default salt, encoding, KDF scheme).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text or a file into a base64 envelope.
    Encrypt {
        /// Cipher: "aes256" (CBC) or "aes256gcm".
        #[arg(short, long, default_value = "aes256")]
        algorithm: SymmetricAlgorithm,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        key: KeyArgs,

        /// Write the envelope here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decrypt a base64 envelope.
    Decrypt {
        /// Cipher: "aes256" (CBC) or "aes256gcm".
        #[arg(short, long, default_value = "aes256")]
        algorithm: SymmetricAlgorithm,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        key: KeyArgs,

        /// Write the plaintext here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit plaintext bytes as-is instead of decoding them as text.
        #[arg(long)]
        raw_output: bool,
    },

    /// Hash text or a file.
    Hash {
        /// Hash function: "sha256" or "sha512".
        #[arg(short, long, default_value = "sha256")]
        algorithm: HashAlgorithm,

        #[command(flatten)]
        input: InputArgs,

        /// Text encoding: "utf16le" or "utf8".
        #[arg(short, long)]
        encoding: Option<TextEncoding>,

        /// Print lowercase hex instead of base64.
        #[arg(long)]
        hex: bool,
    },

    /// Derive a key from a phrase and print it as base64.
    DeriveKey {
        /// Salt appended to the phrase (default: configured salt).
        #[arg(short, long)]
        salt: Option<String>,

        /// Use Argon2id instead of a single SHA-256 pass.
        #[arg(long)]
        stretched: bool,

        /// Argon2id strength: "interactive", "moderate", or "sensitive".
        #[arg(long, default_value = "moderate")]
        strength: String,

        /// Read the phrase from this environment variable.
        #[arg(long)]
        phrase_env: Option<String>,

        /// Text encoding: "utf16le" or "utf8".
        #[arg(short, long)]
        encoding: Option<TextEncoding>,
    },

    /// List supported algorithms and their numeric tags.
    Algorithms {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Inline text input.
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Read input from a file.
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct KeyArgs {
    /// Raw key as base64 (16, 24 or 32 bytes).
    #[arg(long, conflicts_with = "phrase_env")]
    key_b64: Option<String>,

    /// Read the phrase from this environment variable.
    #[arg(long)]
    phrase_env: Option<String>,

    /// Salt appended to the phrase (default: configured salt).
    #[arg(short, long)]
    salt: Option<String>,

    /// Text encoding: "utf16le" or "utf8".
    #[arg(short, long)]
    encoding: Option<TextEncoding>,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{}", truncate_for_log(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Encrypt {
            algorithm,
            input,
            key,
            output,
        } => cmd_encrypt(config, algorithm, &input, &key, output.as_deref()),

        Commands::Decrypt {
            algorithm,
            input,
            key,
            output,
            raw_output,
        } => cmd_decrypt(config, algorithm, &input, &key, output.as_deref(), raw_output),

        Commands::Hash {
            algorithm,
            input,
            encoding,
            hex,
        } => cmd_hash(&config, algorithm, &input, encoding, hex),

        Commands::DeriveKey {
            salt,
            stretched,
            strength,
            phrase_env,
            encoding,
        } => cmd_derive_key(
            config,
            salt.as_deref(),
            stretched,
            &strength,
            phrase_env.as_deref(),
            encoding,
        ),

        Commands::Algorithms { json } => cmd_algorithms(json),

        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sealkit", &mut io::stdout());
            Ok(())
        }
    }
}

/// Load configuration from `path`, or the defaults.
fn load_config(path: Option<&Path>) -> Result<CryptoConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            CryptoConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))
        }
        None => Ok(CryptoConfig::default()),
    }
}

/// Read the input as bytes: inline text is encoded, files are taken as-is.
fn read_input(input: &InputArgs, encoding: TextEncoding) -> Result<Zeroizing<Vec<u8>>> {
    match (&input.text, &input.input) {
        (Some(text), _) => Ok(Zeroizing::new(encoding.encode(text))),
        (None, Some(path)) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let bytes = read_to_end_bounded(file, MAX_READ_LIMIT)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(Zeroizing::new(bytes))
        }
        (None, None) => anyhow::bail!("Provide --text or --input"),
    }
}

/// Read an envelope as base64 text, inline or from a file.
fn read_envelope(input: &InputArgs) -> Result<Vec<u8>> {
    let text = match (&input.text, &input.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let bytes = read_to_end_bounded(file, MAX_READ_LIMIT)?;
            String::from_utf8(bytes).context("Envelope file is not base64 text")?
        }
        (None, None) => anyhow::bail!("Provide --text or --input"),
    };
    base64_decode(text.trim()).context("Envelope is not valid base64")
}

/// Read a phrase from the named environment variable, `SEALKIT_PHRASE`, or
/// an interactive prompt.
fn read_phrase(env_var: Option<&str>, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(name) = env_var {
        let phrase = std::env::var(name)
            .with_context(|| format!("Environment variable {} is not set", name))?;
        return Ok(Zeroizing::new(phrase));
    }
    if let Ok(phrase) = std::env::var(PHRASE_ENV) {
        return Ok(Zeroizing::new(phrase));
    }

    let phrase = Zeroizing::new(
        rpassword::prompt_password("Enter phrase: ").context("Failed to read phrase")?,
    );
    if confirm {
        let again = Zeroizing::new(
            rpassword::prompt_password("Confirm phrase: ").context("Failed to read phrase")?,
        );
        if *phrase != *again {
            anyhow::bail!("Phrases do not match");
        }
    }
    if phrase.is_empty() {
        anyhow::bail!("Phrase cannot be empty");
    }
    Ok(phrase)
}

/// Resolve the key: a raw base64 key, or one derived from a phrase.
fn resolve_key(config: &CryptoConfig, key: &KeyArgs, confirm: bool) -> Result<Zeroizing<Vec<u8>>> {
    if let Some(encoded) = &key.key_b64 {
        let raw = Zeroizing::new(base64_decode(encoded).context("Key is not valid base64")?);
        debug!("Using raw {}-bit key", raw.len() * 8);
        return Ok(raw);
    }

    let phrase = read_phrase(key.phrase_env.as_deref(), confirm)?;
    let derived = derive_key_with(config, &phrase, key.salt.as_deref())
        .context("Key derivation failed")?;
    if key.salt.is_none() {
        info!("No salt supplied; using the configured default salt");
    }
    Ok(Zeroizing::new(derived.as_bytes().to_vec()))
}

/// Write `bytes` to `output`, or stdout.
fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Encrypt input into a base64 envelope.
fn cmd_encrypt(
    mut config: CryptoConfig,
    algorithm: SymmetricAlgorithm,
    input: &InputArgs,
    key: &KeyArgs,
    output: Option<&Path>,
) -> Result<()> {
    if let Some(encoding) = key.encoding {
        config.encoding = encoding;
    }
    info!("Encrypting with {}", algorithm);

    let plaintext = read_input(input, config.encoding)?;
    let key = resolve_key(&config, key, true)?;

    let envelope = encrypt(algorithm, &plaintext, &key).context("Encryption failed")?;
    debug!("Envelope is {} bytes", envelope.len());

    let mut encoded = base64_encode(&envelope);
    encoded.push('\n');
    write_output(output, encoded.as_bytes())
}

/// Decrypt a base64 envelope.
fn cmd_decrypt(
    mut config: CryptoConfig,
    algorithm: SymmetricAlgorithm,
    input: &InputArgs,
    key: &KeyArgs,
    output: Option<&Path>,
    raw_output: bool,
) -> Result<()> {
    if let Some(encoding) = key.encoding {
        config.encoding = encoding;
    }
    info!("Decrypting with {}", algorithm);

    let envelope = read_envelope(input)?;
    let key = resolve_key(&config, key, false)?;

    let plaintext =
        SensitiveBytes::new(decrypt(algorithm, &envelope, &key).context("Decryption failed")?);

    if raw_output {
        return write_output(output, plaintext.as_bytes());
    }

    let mut text = Zeroizing::new(
        config
            .encoding
            .decode(plaintext.as_bytes())
            .context("Plaintext is not valid text; retry with --raw-output")?,
    );
    text.push('\n');
    write_output(output, text.as_bytes())
}

/// Hash input and print the digest.
fn cmd_hash(
    config: &CryptoConfig,
    algorithm: HashAlgorithm,
    input: &InputArgs,
    encoding: Option<TextEncoding>,
    hex: bool,
) -> Result<()> {
    let encoding = encoding.unwrap_or(config.encoding);
    let bytes = read_input(input, encoding)?;
    debug!("Hashing {} bytes with {}", bytes.len(), algorithm);

    let digest = digest(algorithm, &bytes).context("Hashing failed")?;
    if hex {
        println!("{}", digest.to_hex());
    } else {
        println!("{}", digest.to_base64());
    }
    Ok(())
}

/// Derive a key from a phrase.
fn cmd_derive_key(
    mut config: CryptoConfig,
    salt: Option<&str>,
    stretched: bool,
    strength: &str,
    phrase_env: Option<&str>,
    encoding: Option<TextEncoding>,
) -> Result<()> {
    if let Some(encoding) = encoding {
        config.encoding = encoding;
    }
    if stretched {
        config.kdf = KdfScheme::Argon2id(KdfParams::preset(strength)?);
    }

    let phrase = read_phrase(phrase_env, false)?;

    match (&config.kdf, salt) {
        (KdfScheme::Argon2id(params), None) => {
            info!("Deriving Argon2id key with a random salt");
            let salt = Salt::generate();
            let phrase_bytes = Zeroizing::new(config.encoding.encode(&phrase));
            let key = derive_key_stretched(&phrase_bytes, &salt, params)
                .context("Key derivation failed")?;
            println!("key:  {}", base64_encode(key.as_bytes()));
            println!("salt: {}", base64_encode(salt.as_bytes()));
        }
        _ => {
            let key = derive_key_with(&config, &phrase, salt).context("Key derivation failed")?;
            println!("{}", base64_encode(key.as_bytes()));
        }
    }
    Ok(())
}

/// Print the algorithm tables.
fn cmd_algorithms(json: bool) -> Result<()> {
    let symmetric = SymmetricAlgorithm::table();
    let hash = HashAlgorithm::table();

    if json {
        let value = serde_json::json!({
            "symmetric": symmetric,
            "hash": hash,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Symmetric algorithms:");
    for (name, tag) in &symmetric {
        println!("  {:<10} {}", name, tag);
    }
    println!("Hash algorithms:");
    for (name, tag) in &hash {
        println!("  {:<10} {}", name, tag);
    }
    Ok(())
}
