//! Cryptographic core for Lockbox.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption bound to a label (`cipher`)
//! - The packed on-disk blob layout (`blob`)
//! - The zeroize-on-drop master key container (`keys`)

pub mod blob;
pub mod cipher;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{SecretCipher, MasterKey, pack, unpack};
pub use blob::{pack, unpack, MIN_BLOB_LEN, NONCE_LEN, TAG_LEN};
pub use cipher::{EncryptedSecret, SecretCipher};
pub use keys::MasterKey;
