//! AES-256-GCM authenticated encryption bound to a label.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! authenticates the secret's label as associated data (AAD). The label
//! itself is never encrypted, but swapping labels between two stored
//! records — or re-labeling a record without re-encrypting — fails tag
//! verification on decrypt.
//!
//! Nonce reuse under the same key would break both confidentiality and
//! integrity, so the nonce is drawn from the OS CSPRNG on every call.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::crypto::blob::{NONCE_LEN, TAG_LEN};
use crate::errors::{LockboxError, Result};

/// Length of the cipher key in bytes (AES-256).
const KEY_LEN: usize = 32;

/// The output of one `encrypt` call, ready to be packed for storage.
pub struct EncryptedSecret {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

/// Authenticated cipher over the master key.
///
/// Holds its own copy of the key bytes, wiped when the cipher is
/// dropped.
pub struct SecretCipher {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl SecretCipher {
    /// Build a cipher from a 32-byte key. Any other length is rejected.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(LockboxError::InvalidKeySize(key.len()));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(key);
        Ok(Self { key: bytes })
    }

    /// Encrypt `plaintext` with `label` as AAD.
    ///
    /// Returns the nonce, tag, and ciphertext separately; the
    /// ciphertext has the same byte length as the UTF-8 plaintext.
    pub fn encrypt(&self, label: &str, plaintext: &str) -> Result<EncryptedSecret> {
        let cipher = self.cipher()?;

        // Fresh random nonce for every call.
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // Copy the plaintext into a buffer that is wiped on every exit
        // path, including encryption failure.
        let buf = Zeroizing::new(plaintext.as_bytes().to_vec());

        let mut sealed = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &buf,
                    aad: label.as_bytes(),
                },
            )
            .map_err(|e| LockboxError::EncryptionFailed(format!("encryption error: {e}")))?;

        // aes-gcm appends the 16-byte tag to the ciphertext; split it
        // back out so the caller controls the storage layout.
        let tag_start = sealed.len() - TAG_LEN;
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&sealed[tag_start..]);
        sealed.truncate(tag_start);

        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&nonce);

        Ok(EncryptedSecret {
            nonce: nonce_bytes,
            tag,
            ciphertext: sealed,
        })
    }

    /// Decrypt and verify a stored secret.
    ///
    /// Verification covers the ciphertext, the nonce, and the label
    /// (AAD). Any alteration — or a wrong key — yields
    /// `AuthenticationFailed`; no partial plaintext is ever returned.
    pub fn decrypt(
        &self,
        label: &str,
        nonce: &[u8; NONCE_LEN],
        tag: &[u8; TAG_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<String>> {
        let cipher = self.cipher()?;

        // Reassemble the ciphertext || tag form the AEAD API expects.
        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let plaintext = cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: &sealed,
                    aad: label.as_bytes(),
                },
            )
            .map_err(|_| LockboxError::AuthenticationFailed)?;

        // The decrypted buffer is wiped once the text is copied out,
        // or immediately if it is not valid UTF-8.
        let plaintext = Zeroizing::new(plaintext);
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| LockboxError::AuthenticationFailed)?;

        Ok(Zeroizing::new(text.to_string()))
    }

    /// Build the AES-256-GCM instance from the held key bytes.
    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_ref())
            .map_err(|_| LockboxError::InvalidKeySize(self.key.len()))
    }
}
