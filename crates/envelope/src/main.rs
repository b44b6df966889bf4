//! `sealctl`: operator CLI for secret envelopes.
//!
//! Startup sequence:
//! 1. Parse arguments. `mask` runs here; it needs neither key nor configuration.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging (stderr).
//! 4. Build the [`SecretCodec`] (fails fast on a bad key) and run the command.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use secret_envelope::config::Config;
use secret_envelope::{mask, telemetry, Decoded, SecretCodec};

/// Seal, open, and inspect secret envelopes.
#[derive(Parser, Debug)]
#[command(name = "sealctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a value into an envelope.
    Encrypt {
        /// Value to encrypt; read from stdin when omitted.
        value: Option<String>,
    },
    /// Decrypt an envelope. Non-envelopes are printed unchanged.
    Decrypt {
        /// Stored value; read from stdin when omitted.
        value: Option<String>,
        /// Fail instead of passing through values that did not decrypt,
        /// including empty input.
        #[arg(long)]
        strict: bool,
    },
    /// Print a display-safe JSON view of a stored value.
    Inspect {
        /// Stored value; read from stdin when omitted.
        value: Option<String>,
    },
    /// Print the masked form of a value. Needs no key.
    Mask {
        /// Value to mask; read from stdin when omitted.
        value: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Mask { value } => {
            let value = value_or_stdin(value)?;
            println!("{}", mask(Some(&value)));
        }
        Command::Encrypt { value } => {
            let codec = start()?;
            let value = value_or_stdin(value)?;
            if let Some(envelope) = codec.encrypt(Some(&value))? {
                println!("{envelope}");
            }
        }
        Command::Decrypt { value, strict } => {
            let codec = start()?;
            let value = value_or_stdin(value)?;
            if value.is_empty() {
                if strict {
                    anyhow::bail!("no value to decrypt");
                }
                return Ok(());
            }
            match codec.decode(&value) {
                Decoded::Decrypted(plaintext) => println!("{plaintext}"),
                Decoded::Legacy(_) if strict => anyhow::bail!("value is not an envelope"),
                Decoded::Unauthenticated(_) if strict => {
                    anyhow::bail!("envelope failed authentication")
                }
                other => println!("{}", other.into_plaintext()),
            }
        }
        Command::Inspect { value } => {
            let codec = start()?;
            let value = value_or_stdin(value)?;
            let view = codec.view(Some(&value));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

/// Steps 2-4: configuration, logging, codec.
fn start() -> Result<SecretCodec> {
    let cfg = Config::from_env().map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;
    telemetry::init(&cfg.log_level)?;

    let codec = SecretCodec::from_config(&cfg).context("secret store key is not usable")?;
    info!(version = env!("CARGO_PKG_VERSION"), "sealctl ready");
    Ok(codec)
}

/// Use the argument if given, otherwise read stdin and strip one trailing newline.
fn value_or_stdin(value: Option<String>) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read value from stdin")?;
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}
