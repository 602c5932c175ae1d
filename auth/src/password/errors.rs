use thiserror::Error;

/// Error type for password hashing operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
