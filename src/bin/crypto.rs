// src/bin/crypto.rs
//! `crypto`: encrypt / decrypt / keygen from the command line
//!
//! Output to the console is printed as text; ciphertext defaults to base64
//! there and to raw bytes when written to a file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crypto_codec::aliases::Passphrase;
use crypto_codec::enums::AUTO;
use crypto_codec::{
    load_config, select_output_fmt, AesMode, Algorithm, CryptoError, CryptoSdk, DesMode,
    ErrorKind, KeyFormat, KeygenMode, KeygenRequest, Output, Padding, Request, RsaPadding,
};
use rpassword::prompt_password;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crypto", version, about = "AES / DES / RSA codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt, encode or digest a file or inline content
    Encrypt(CodecArgs),
    /// Decrypt or decode a file or inline content
    Decrypt(CodecArgs),
    /// Generate a key pair
    Keygen(KeygenArgs),
}

#[derive(Args)]
struct CodecArgs {
    /// Input file; omit to use --content
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Inline input
    #[arg(short, long)]
    content: Option<String>,
    /// Output file; omit to print
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, default_value = "aes")]
    algo: String,
    #[arg(short, long, default_value = AUTO)]
    mode: String,
    /// Key literal (symmetric) or PEM text
    #[arg(short, long, default_value = "")]
    key: String,
    /// Read the key from a file instead (PEM keys)
    #[arg(long, conflicts_with = "key")]
    key_file: Option<PathBuf>,
    /// Passphrase of an encrypted private key
    #[arg(long)]
    passwd: Option<String>,
    #[arg(short, long, default_value = AUTO)]
    padding: String,
    #[arg(long, default_value = "")]
    iv: String,
    #[arg(short, long, default_value = AUTO)]
    fmt: String,
}

#[derive(Args)]
struct KeygenArgs {
    /// Write `<output>.pub` and `<output>.pem`; omit to print
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, default_value = "rsa")]
    algo: String,
    #[arg(short, long, default_value = AUTO)]
    fmt: String,
    /// Cipher protecting the private key
    #[arg(short, long, default_value = AUTO)]
    mode: String,
    #[arg(short, long, default_value_t = 0)]
    bits: usize,
    #[arg(long)]
    passwd: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let sdk = CryptoSdk::new();
    sdk.init(load_config()?)?;

    match cli.command {
        Command::Encrypt(args) => codec(&sdk, &args, true),
        Command::Decrypt(args) => codec(&sdk, &args, false),
        Command::Keygen(args) => keygen(&sdk, &args),
    }
}

fn codec(sdk: &CryptoSdk, args: &CodecArgs, encrypt: bool) -> Result<()> {
    let key = match &args.key_file {
        Some(path) => fs::read(path).with_context(|| format!("reading key {}", path.display()))?,
        None => args.key.clone().into_bytes(),
    };
    let content = args.content.as_deref().unwrap_or_default().as_bytes();

    let mut req = match &args.input {
        Some(path) => Request::file(&args.algo, path),
        None => Request::memory(&args.algo, content),
    };
    req = req
        .mode(&args.mode)
        .key(&key)
        .padding(&args.padding)
        .iv(args.iv.as_bytes());
    if let Some(out) = &args.output {
        req = req.to_file(out);
    }
    if let Some(pass) = &args.passwd {
        req = req.passphrase(pass);
    }

    let result = if encrypt {
        let algo = args.algo.parse::<Algorithm>().ok();
        let fmt = match algo {
            Some(a) => select_output_fmt(a, &args.fmt, args.output.is_some()),
            None => args.fmt.as_str(),
        };
        sdk.encrypt(&req.fmt(fmt))
    } else {
        sdk.decrypt(&req.fmt(&args.fmt))
    };

    match result {
        Ok(Output::Memory(bytes)) => {
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        Ok(Output::File(path)) => {
            info!("written to {}", path.display());
            Ok(())
        }
        Err(e) => {
            list_choices(sdk, &e, &args.algo, encrypt);
            Err(e.into())
        }
    }
}

fn keygen(sdk: &CryptoSdk, args: &KeygenArgs) -> Result<()> {
    let mode = if args.mode == AUTO {
        sdk.registry()?.config().defaults.keygen_mode
    } else {
        args.mode.parse::<KeygenMode>().unwrap_or(KeygenMode::None)
    };
    let passphrase = match (&args.passwd, mode) {
        (Some(p), _) => Some(Passphrase::new(p.clone())),
        (None, KeygenMode::None) => None,
        (None, _) => Some(Passphrase::new(
            prompt_password("Private key passphrase: ").context("reading passphrase")?,
        )),
    };

    let mut req = KeygenRequest::new(&args.algo)
        .bits(args.bits)
        .format(&args.fmt)
        .mode(&args.mode);
    if let Some(pass) = &passphrase {
        req = req.passphrase(pass);
    }

    let pair = match sdk.make_key_pair(&req) {
        Ok(pair) => pair,
        Err(e) => {
            if e.is_invalid_choice() {
                let valid: &[&str] = match e.kind() {
                    ErrorKind::InvalidFmt => KeyFormat::NAMES,
                    ErrorKind::InvalidMode => KeygenMode::NAMES,
                    _ => &[],
                };
                print_valid(&e, valid);
            }
            return Err(e.into());
        }
    };

    match &args.output {
        Some(base) => {
            let public = base.with_extension("pub");
            let private = base.with_extension("pem");
            fs::write(&public, &pair.public_pem)
                .with_context(|| format!("writing {}", public.display()))?;
            fs::write(&private, pair.private_pem.expose_secret())
                .with_context(|| format!("writing {}", private.display()))?;
            info!("key pair written to {} and {}", public.display(), private.display());
        }
        None => {
            println!("{}", pair.public_pem);
            println!("{}", pair.private_pem.expose_secret());
        }
    }
    Ok(())
}

fn list_choices(sdk: &CryptoSdk, err: &CryptoError, algo: &str, encrypt: bool) {
    if !err.is_invalid_choice() {
        return;
    }
    let algo = algo.parse::<Algorithm>().ok();
    let algos: Vec<&str> = match sdk.registry() {
        Ok(reg) if encrypt => reg.encryptor_names(),
        Ok(reg) => reg.decryptor_names(),
        Err(_) => Vec::new(),
    };
    let valid: &[&str] = match (err.kind(), algo) {
        (ErrorKind::InvalidAlgo, _) => algos.as_slice(),
        (ErrorKind::InvalidMode, Some(Algorithm::Des)) => DesMode::NAMES,
        (ErrorKind::InvalidMode, _) => AesMode::ACCEPTED,
        (ErrorKind::InvalidPadding, Some(Algorithm::Rsa)) => RsaPadding::NAMES,
        (ErrorKind::InvalidPadding, _) => Padding::ACCEPTED,
        (ErrorKind::InvalidFmt, _) => &["hex", "base64", "none"],
        _ => &[],
    };
    print_valid(err, valid);
}

fn print_valid(err: &CryptoError, valid: &[&str]) {
    error!("{err}; valid choices: {}", valid.join(", "));
}
