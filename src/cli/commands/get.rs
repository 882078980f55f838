//! `lockbox get` — decrypt and print a single secret.

use crate::cli::{open_cipher, open_store, Cli};
use crate::crypto::blob;
use crate::errors::{LockboxError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: i64) -> Result<()> {
    let store = open_store(cli)?;

    let (label, packed) = store
        .get_by_id(id)?
        .ok_or(LockboxError::NotFound(id))?;

    // Corrupt blobs are rejected here, before any decryption runs.
    let (nonce, tag, ciphertext) = blob::unpack(&packed)?;

    let cipher = open_cipher(cli)?;
    let value = cipher.decrypt(&label, &nonce, &tag, ciphertext)?;

    println!("Label: {label}");
    println!("{}", value.as_str());

    Ok(())
}
