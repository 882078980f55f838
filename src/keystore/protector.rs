//! OS-identity-bound key protection.
//!
//! The master key is never written to disk in plaintext. Instead it is
//! wrapped into an opaque token that only the same OS user account can
//! open again, and that token is what the key file holds.
//!
//! The `KeyProtector` trait is the seam: alternate backends (platform
//! keychains, hardware-backed stores) can be substituted without
//! touching the key custodian. The default backend keeps a per-user
//! 32-byte wrapping key in the operating system's credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Wrapping is AES-256-GCM under that wrapping key, with a fixed
//! application entropy constant as AAD, so a token is only meaningful
//! to this application running as the same user. The token reuses the
//! packed blob layout: nonce(12) || tag(16) || wrapped key.

use aes_gcm::aead::{Aead, KeyInit, OsRng as AeadOsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::TryRngCore;
use zeroize::Zeroizing;

use crate::crypto::blob;
use crate::errors::{LockboxError, Result};

/// Service name used in the OS keyring.
const SERVICE_NAME: &str = "lockbox";

/// Keyring entry name for the per-user wrapping key.
const WRAPPING_KEY_ENTRY: &str = "wrapping-key";

/// App-specific extra entropy mixed into every wrap/unwrap (constant
/// per application, authenticated as AAD).
const APP_ENTROPY: &[u8] = b"lockbox-app-entropy-v1";

/// Length of the wrapping key in bytes.
const WRAP_KEY_LEN: usize = 32;

/// Protect/unprotect a secret using an OS-identity-bound facility.
pub trait KeyProtector {
    /// Wrap `key` into an opaque token scoped to the current OS user.
    fn wrap(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Unwrap a token produced by `wrap` under the same OS identity.
    fn unwrap(&self, token: &[u8]) -> Result<Zeroizing<Vec<u8>>>;
}

/// Default protector backed by the OS keyring.
pub struct OsKeyring {
    service: String,
}

impl OsKeyring {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, WRAPPING_KEY_ENTRY).map_err(|e| {
            LockboxError::KeyUnavailable(format!("failed to create keyring entry: {e}"))
        })
    }

    /// Read the wrapping key for the current user, failing if absent.
    fn load_wrapping_key(&self) -> Result<Zeroizing<[u8; WRAP_KEY_LEN]>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(encoded) => decode_wrapping_key(&encoded),
            Err(keyring::Error::NoEntry) => Err(LockboxError::KeyUnavailable(
                "no wrapping key in the OS keyring for this user".into(),
            )),
            Err(e) => Err(LockboxError::KeyUnavailable(format!(
                "failed to read from keyring: {e}"
            ))),
        }
    }

    /// Read the wrapping key, creating one if none exists yet.
    ///
    /// After creating, the entry is read back and the stored value is
    /// used, so two first-runs racing here converge on whichever write
    /// the platform keyring kept.
    fn load_or_create_wrapping_key(&self) -> Result<Zeroizing<[u8; WRAP_KEY_LEN]>> {
        let entry = self.entry().map_err(persist_err)?;

        match entry.get_password() {
            Ok(encoded) => return decode_wrapping_key(&encoded).map_err(persist_err),
            Err(keyring::Error::NoEntry) => {}
            Err(e) => {
                return Err(LockboxError::KeyPersistFailed(format!(
                    "failed to read from keyring: {e}"
                )))
            }
        }

        let mut fresh = Zeroizing::new([0u8; WRAP_KEY_LEN]);
        rand::rngs::OsRng
            .try_fill_bytes(fresh.as_mut())
            .map_err(|e| LockboxError::KeyPersistFailed(format!("system RNG failure: {e}")))?;

        // Keyrings store strings, so the key goes in base64-encoded.
        let encoded = Zeroizing::new(BASE64.encode(fresh.as_ref()));
        entry.set_password(&encoded).map_err(|e| {
            LockboxError::KeyPersistFailed(format!("failed to store wrapping key: {e}"))
        })?;

        let stored = entry.get_password().map_err(|e| {
            LockboxError::KeyPersistFailed(format!("failed to read back wrapping key: {e}"))
        })?;
        decode_wrapping_key(&stored).map_err(persist_err)
    }
}

impl Default for OsKeyring {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyProtector for OsKeyring {
    fn wrap(&self, key: &[u8]) -> Result<Vec<u8>> {
        let wrapping_key = self.load_or_create_wrapping_key()?;

        let cipher = Aes256Gcm::new_from_slice(wrapping_key.as_ref())
            .map_err(|e| LockboxError::KeyPersistFailed(format!("wrap cipher init: {e}")))?;

        let nonce = Aes256Gcm::generate_nonce(&mut AeadOsRng);

        let mut sealed = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: key,
                    aad: APP_ENTROPY,
                },
            )
            .map_err(|e| LockboxError::KeyPersistFailed(format!("wrap failed: {e}")))?;

        let tag_start = sealed.len() - blob::TAG_LEN;
        let mut tag = [0u8; blob::TAG_LEN];
        tag.copy_from_slice(&sealed[tag_start..]);
        sealed.truncate(tag_start);

        let mut nonce_bytes = [0u8; blob::NONCE_LEN];
        nonce_bytes.copy_from_slice(&nonce);

        Ok(blob::pack(&nonce_bytes, &tag, &sealed))
    }

    fn unwrap(&self, token: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let wrapping_key = self.load_wrapping_key()?;

        let (nonce, tag, wrapped) = blob::unpack(token)
            .map_err(|_| LockboxError::KeyUnavailable("protected key record is malformed".into()))?;

        let cipher = Aes256Gcm::new_from_slice(wrapping_key.as_ref())
            .map_err(|e| LockboxError::KeyUnavailable(format!("unwrap cipher init: {e}")))?;

        let mut sealed = Vec::with_capacity(wrapped.len() + blob::TAG_LEN);
        sealed.extend_from_slice(wrapped);
        sealed.extend_from_slice(&tag);

        let key = cipher
            .decrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &sealed,
                    aad: APP_ENTROPY,
                },
            )
            .map_err(|_| {
                LockboxError::KeyUnavailable(
                    "protected key record failed verification — wrong user or corrupted file"
                        .into(),
                )
            })?;

        Ok(Zeroizing::new(key))
    }
}

/// Decode a base64 keyring value into a 32-byte wrapping key.
fn decode_wrapping_key(encoded: &str) -> Result<Zeroizing<[u8; WRAP_KEY_LEN]>> {
    let decoded = Zeroizing::new(BASE64.decode(encoded).map_err(|e| {
        LockboxError::KeyUnavailable(format!("stored wrapping key is not valid base64: {e}"))
    })?);

    if decoded.len() != WRAP_KEY_LEN {
        return Err(LockboxError::KeyUnavailable(format!(
            "stored wrapping key must be {} bytes, got {}",
            WRAP_KEY_LEN,
            decoded.len()
        )));
    }

    let mut key = Zeroizing::new([0u8; WRAP_KEY_LEN]);
    key.copy_from_slice(&decoded);
    Ok(key)
}

fn persist_err(e: LockboxError) -> LockboxError {
    match e {
        LockboxError::KeyUnavailable(msg) => LockboxError::KeyPersistFailed(msg),
        other => other,
    }
}
