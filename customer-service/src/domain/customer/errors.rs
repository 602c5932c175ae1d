use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for authentication operations.
///
/// Each failure is a distinct outcome so the calling boundary can map it
/// to a distinct status: credential failures to unauthorized, policy and
/// duplicate failures to bad-request, store failures to a retryable
/// server error.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Customer not found or inactive")]
    NotFoundOrInactive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Password does not meet the strength policy")]
    WeakPassword,

    /// Wraps any underlying persistence failure. Transient: safe to retry.
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    // Programmer errors from the leaf crates (malformed input to hashing
    // or token encoding); callers reject such input at the boundary.
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    // Value object reconstruction errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl AuthError {
    /// Whether the caller may retry the failed operation as-is.
    ///
    /// Only store outages are transient; the policy and credential
    /// failures are terminal for the request that produced them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable(_))
    }
}
