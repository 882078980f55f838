//! Packed blob layout for stored secrets.
//!
//! A secret's cryptographic material is stored as one opaque blob:
//!   [ 12-byte nonce | 16-byte auth tag | ciphertext ]
//!
//! Total length is `28 + n` where `n` is the plaintext byte length
//! (AES-GCM adds no padding). Anything shorter than 28 bytes cannot be
//! a valid record and is rejected before decryption is attempted.

use crate::errors::{LockboxError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest possible valid blob (empty plaintext).
pub const MIN_BLOB_LEN: usize = NONCE_LEN + TAG_LEN;

/// Pack nonce, tag, and ciphertext into a single storage blob.
pub fn pack(nonce: &[u8; NONCE_LEN], tag: &[u8; TAG_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(MIN_BLOB_LEN + ciphertext.len());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(tag);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Split a storage blob back into (nonce, tag, ciphertext).
///
/// Returns `CorruptRecord` for any blob shorter than 28 bytes.
pub fn unpack(blob: &[u8]) -> Result<([u8; NONCE_LEN], [u8; TAG_LEN], &[u8])> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(LockboxError::CorruptRecord);
    }

    let (nonce_bytes, rest) = blob.split_at(NONCE_LEN);
    let (tag_bytes, ciphertext) = rest.split_at(TAG_LEN);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(tag_bytes);

    Ok((nonce, tag, ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        let nonce = [0x11u8; NONCE_LEN];
        let tag = [0x22u8; TAG_LEN];
        let ct = b"some ciphertext bytes";

        let blob = pack(&nonce, &tag, ct);
        assert_eq!(blob.len(), MIN_BLOB_LEN + ct.len());

        let (n, t, c) = unpack(&blob).unwrap();
        assert_eq!(n, nonce);
        assert_eq!(t, tag);
        assert_eq!(c, ct);
    }

    #[test]
    fn empty_ciphertext_is_valid() {
        let blob = pack(&[0u8; NONCE_LEN], &[0u8; TAG_LEN], &[]);
        assert_eq!(blob.len(), MIN_BLOB_LEN);

        let (_, _, ct) = unpack(&blob).unwrap();
        assert!(ct.is_empty());
    }

    #[test]
    fn short_blob_is_corrupt() {
        for len in 0..MIN_BLOB_LEN {
            let blob = vec![0u8; len];
            let result = unpack(&blob);
            assert!(
                matches!(result, Err(LockboxError::CorruptRecord)),
                "blob of length {len} must be rejected"
            );
        }
    }

    #[test]
    fn exactly_28_bytes_is_accepted() {
        let blob = vec![0u8; MIN_BLOB_LEN];
        assert!(unpack(&blob).is_ok());
    }
}
