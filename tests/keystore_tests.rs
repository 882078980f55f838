//! Integration tests for the key custodian.
//!
//! The real OS keyring cannot be driven from CI, so these tests plug
//! test protectors into the `KeyProtector` seam. The custodian's
//! behavior — create once, unwrap thereafter, surface failures instead
//! of regenerating — is identical for every backend.

use lockbox::errors::{LockboxError, Result};
use lockbox::keystore::{KeyProtector, KeyStore};
use tempfile::TempDir;
use zeroize::Zeroizing;

/// Reversible stand-in for the OS facility: prefixes a marker.
struct MarkerProtector(&'static [u8]);

impl KeyProtector for MarkerProtector {
    fn wrap(&self, key: &[u8]) -> Result<Vec<u8>> {
        let mut token = self.0.to_vec();
        token.extend_from_slice(key);
        Ok(token)
    }

    fn unwrap(&self, token: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        match token.strip_prefix(self.0) {
            Some(key) => Ok(Zeroizing::new(key.to_vec())),
            None => Err(LockboxError::KeyUnavailable(
                "token was wrapped under a different identity".into(),
            )),
        }
    }
}

/// Protector whose wrap side always fails, to exercise the cleanup path.
struct FailingProtector;

impl KeyProtector for FailingProtector {
    fn wrap(&self, _key: &[u8]) -> Result<Vec<u8>> {
        Err(LockboxError::KeyPersistFailed("facility unavailable".into()))
    }

    fn unwrap(&self, _token: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        Err(LockboxError::KeyUnavailable("facility unavailable".into()))
    }
}

#[test]
fn get_or_create_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::new(dir.path());
    let protector = MarkerProtector(b"user-a:");

    let first = store.get_or_create_key(&protector).unwrap();
    let record_after_first = std::fs::read(store.key_path()).unwrap();

    let second = store.get_or_create_key(&protector).unwrap();
    let record_after_second = std::fs::read(store.key_path()).unwrap();

    assert_eq!(first.as_bytes(), second.as_bytes());
    // The on-disk record is created exactly once, never rewritten.
    assert_eq!(record_after_first, record_after_second);
}

#[test]
fn fresh_key_is_filled_from_the_system_rng() {
    let dir = TempDir::new().unwrap();
    let key = KeyStore::new(dir.path())
        .get_or_create_key(&MarkerProtector(b"user-a:"))
        .unwrap();

    assert_eq!(key.as_bytes().len(), 32);
    assert_ne!(
        key.as_bytes(),
        &[0u8; 32],
        "generated key must not be the zeroed buffer"
    );
}

#[test]
fn keys_differ_across_installations() {
    let protector = MarkerProtector(b"user-a:");

    let dir1 = TempDir::new().unwrap();
    let dir2 = TempDir::new().unwrap();
    let key1 = KeyStore::new(dir1.path()).get_or_create_key(&protector).unwrap();
    let key2 = KeyStore::new(dir2.path()).get_or_create_key(&protector).unwrap();

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn record_from_other_identity_is_key_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::new(dir.path());

    // Created as "user-a"...
    store
        .get_or_create_key(&MarkerProtector(b"user-a:"))
        .unwrap();

    // ...unwrapped as "user-b": must fail, never regenerate.
    let result = store.get_or_create_key(&MarkerProtector(b"user-b:"));
    assert!(matches!(result, Err(LockboxError::KeyUnavailable(_))));
    assert!(store.key_path().exists(), "record must be left untouched");
}

#[test]
fn unavailable_facility_surfaces_on_existing_record() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::new(dir.path());

    store
        .get_or_create_key(&MarkerProtector(b"user-a:"))
        .unwrap();

    let result = store.get_or_create_key(&FailingProtector);
    assert!(matches!(result, Err(LockboxError::KeyUnavailable(_))));
}

#[test]
fn wrap_failure_leaves_no_record_behind() {
    let dir = TempDir::new().unwrap();
    let store = KeyStore::new(dir.path());

    let result = store.get_or_create_key(&FailingProtector);
    assert!(matches!(result, Err(LockboxError::KeyPersistFailed(_))));
    assert!(
        !store.key_path().exists(),
        "a key that was never durably wrapped must not leave a record"
    );

    // A later run with a working facility starts cleanly.
    let key = store
        .get_or_create_key(&MarkerProtector(b"user-a:"))
        .unwrap();
    assert_eq!(key.as_bytes().len(), 32);
}

#[test]
fn unwrapped_key_with_wrong_length_is_rejected() {
    /// Protector that "loses" bytes on unwrap.
    struct TruncatingProtector;

    impl KeyProtector for TruncatingProtector {
        fn wrap(&self, key: &[u8]) -> Result<Vec<u8>> {
            Ok(key.to_vec())
        }

        fn unwrap(&self, token: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
            Ok(Zeroizing::new(token[..16].to_vec()))
        }
    }

    let dir = TempDir::new().unwrap();
    let store = KeyStore::new(dir.path());

    store.get_or_create_key(&TruncatingProtector).unwrap();
    let result = store.get_or_create_key(&TruncatingProtector);
    assert!(matches!(result, Err(LockboxError::KeyUnavailable(_))));
}
