//! Key custodian — lifecycle of the single master key.
//!
//! The key is generated once, on first use, and persisted only in
//! wrapped form (see `protector`). Every later invocation unwraps the
//! same file and gets byte-identical key material back. A record that
//! exists but cannot be unwrapped is a hard error: silently generating
//! a replacement key would orphan every previously encrypted secret.

pub mod protector;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::TryRngCore;
use zeroize::Zeroizing;

use crate::crypto::keys::{MasterKey, KEY_LEN};
use crate::errors::{LockboxError, Result};

pub use protector::{KeyProtector, OsKeyring};

/// File name of the protected key record inside the data directory.
const KEY_FILE_NAME: &str = "master.key";

/// Owns the protected key record at `<data_dir>/master.key`.
pub struct KeyStore {
    key_path: PathBuf,
}

impl KeyStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            key_path: data_dir.join(KEY_FILE_NAME),
        }
    }

    /// Path of the protected key record (for display/testing).
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Return the master key, creating and persisting it on first use.
    ///
    /// An existing record is unwrapped via `protector`; unwrap failure
    /// surfaces as `KeyUnavailable`. On first run, 32 fresh random
    /// bytes are wrapped and written with an exclusive create — if
    /// another process wins the race between the existence check and
    /// the write, this returns `KeyPersistFailed` instead of
    /// clobbering the winner's record. A key that was generated but
    /// not durably wrapped is wiped before the error propagates.
    pub fn get_or_create_key(&self, protector: &dyn KeyProtector) -> Result<MasterKey> {
        if let Some(dir) = self.key_path.parent() {
            fs::create_dir_all(dir)?;
        }

        if self.key_path.exists() {
            let token = fs::read(&self.key_path).map_err(|e| {
                LockboxError::KeyUnavailable(format!("cannot read protected key record: {e}"))
            })?;
            let key = protector.unwrap(&token)?;
            return MasterKey::from_slice(&key).map_err(|_| {
                LockboxError::KeyUnavailable(format!(
                    "unwrapped key must be {KEY_LEN} bytes, got {}",
                    key.len()
                ))
            });
        }

        // First run: generate the key into a buffer that is wiped on
        // every exit path, wrap it, then persist with create_new.
        let mut fresh = Zeroizing::new([0u8; KEY_LEN]);
        rand::rngs::OsRng
            .try_fill_bytes(fresh.as_mut())
            .map_err(|e| LockboxError::KeyPersistFailed(format!("system RNG failure: {e}")))?;

        let token = protector.wrap(fresh.as_ref())?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.key_path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    LockboxError::KeyPersistFailed(
                        "another process created the key record first".into(),
                    )
                } else {
                    LockboxError::KeyPersistFailed(format!("cannot create key record: {e}"))
                }
            })?;

        file.write_all(&token)
            .and_then(|()| file.sync_all())
            .map_err(|e| {
                LockboxError::KeyPersistFailed(format!("cannot write key record: {e}"))
            })?;

        // Restrict the record to the owner. The token is opaque to
        // other users anyway, but there is no reason to hand it out.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.key_path, perms).map_err(|e| {
                LockboxError::KeyPersistFailed(format!("cannot restrict key record: {e}"))
            })?;
        }

        Ok(MasterKey::new(*fresh))
    }
}
