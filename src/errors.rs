use thiserror::Error;

/// All errors that can occur in Lockbox.
#[derive(Debug, Error)]
pub enum LockboxError {
    // --- Key lifecycle errors ---
    #[error("Master key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Could not persist new master key: {0}")]
    KeyPersistFailed(String),

    // --- Crypto errors ---
    #[error("Invalid key size: expected 32 bytes, got {0}")]
    InvalidKeySize(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — record tampered, wrong key, or label mismatch")]
    AuthenticationFailed,

    #[error("Corrupted record — stored blob is too short")]
    CorruptRecord,

    // --- Store errors ---
    #[error("No secret with id {0}")]
    NotFound(i64),

    #[error("Store error: {0}")]
    Store(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Lockbox results.
pub type Result<T> = std::result::Result<T, LockboxError>;
