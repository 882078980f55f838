//! Master key container.
//!
//! Exactly one 256-bit master key exists per installation. It lives in
//! process memory only, reconstructed from its wrapped form on each
//! invocation, and is wiped when dropped — on success, on error, and
//! during unwinds alike.

use zeroize::Zeroize;

use crate::errors::{LockboxError, Result};

/// Length of the master key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// A wrapper around the 32-byte master key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Create a `MasterKey` from a slice, validating its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(LockboxError::InvalidKeySize(bytes.len()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Access the raw key bytes (e.g. to build the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
