use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Expected a refresh token, got type {0:?}")]
    WrongTokenType(String),
}
