//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;
use crate::crypto::SecretCipher;
use crate::errors::{LockboxError, Result};
use crate::keystore::{KeyStore, OsKeyring};
use crate::store::SecretStore;

/// Maximum label length, to keep listings and AAD sizes sane.
const MAX_LABEL_LEN: usize = 256;

/// Lockbox CLI: local secret store bound to your OS user account.
#[derive(Parser)]
#[command(
    name = "lockbox",
    about = "Local secret store bound to your OS user account",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.lockbox)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt and store a secret
    Add {
        /// Label for the secret (e.g. "wifi")
        label: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Decrypt and display a secret
    Get {
        /// Record id
        id: i64,
    },

    /// List stored secrets (id, label, created)
    List,

    /// Delete a secret
    Delete {
        /// Record id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Find the current user's home directory without extra dependencies.
fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    let var = "HOME";
    #[cfg(windows)]
    let var = "USERPROFILE";

    std::env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| LockboxError::Config(format!("{var} is not set")))
}

/// Resolve the data directory: `--data-dir` flag, then the config
/// file, then `<home>/.lockbox`.
pub fn data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    let home = home_dir()?;
    let settings = Settings::load(&home)?;
    Ok(settings.data_dir(&home))
}

/// Open the secret database inside the data directory.
///
/// Creates the directory if it does not exist yet, so `list` on a
/// fresh install shows an empty table instead of an error.
pub fn open_store(cli: &Cli) -> Result<SecretStore> {
    let dir = data_dir(cli)?;
    std::fs::create_dir_all(&dir)?;
    SecretStore::open(&dir.join("secrets.db"))
}

/// Obtain the master key from the custodian and build the cipher.
///
/// The plaintext key lives only long enough to construct the cipher;
/// both wipe their bytes when dropped.
pub fn open_cipher(cli: &Cli) -> Result<SecretCipher> {
    let dir = data_dir(cli)?;
    let keystore = KeyStore::new(&dir);
    let key = keystore.get_or_create_key(&OsKeyring::new())?;
    SecretCipher::new(key.as_bytes())
}

/// Validate a secret label before storing anything under it.
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(LockboxError::CommandFailed(
            "label cannot be empty".into(),
        ));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(LockboxError::CommandFailed(format!(
            "label cannot exceed {MAX_LABEL_LEN} bytes"
        )));
    }

    Ok(())
}
