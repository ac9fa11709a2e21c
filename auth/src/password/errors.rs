use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The plaintext does not match the stored hash.
    #[error("Password does not match")]
    Mismatch,

    /// The stored hash is corrupted or in a format this hasher does not understand.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}
