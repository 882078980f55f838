//! `lockbox add` — encrypt and store a new secret.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_cipher, open_store, validate_label, Cli};
use crate::crypto::blob;
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, label: &str, value: Option<&str>) -> Result<()> {
    validate_label(label)?;

    // Determine the secret value from one of three sources.
    let secret_value: Zeroizing<String> = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for '{label}'"))
            .interact()
            .map_err(|e| {
                crate::errors::LockboxError::CommandFailed(format!("input prompt: {e}"))
            })?;
        Zeroizing::new(v)
    };

    // Key custodian → cipher → store, once for this process.
    let cipher = open_cipher(cli)?;
    let store = open_store(cli)?;

    let sealed = cipher.encrypt(label, &secret_value)?;
    let packed = blob::pack(&sealed.nonce, &sealed.tag, &sealed.ciphertext);
    let id = store.insert(label, &packed)?;

    output::success(&format!("Secret '{label}' stored with id {id}"));
    output::tip(&format!("Retrieve it: lockbox get {id}"));

    Ok(())
}
