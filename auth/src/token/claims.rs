use std::collections::BTreeSet;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token validity window.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Refresh token validity window.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Marker value carried in a refresh token's `type` claim.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claim set carried by an access token.
///
/// Asserts identity and roles for request authorization over a short
/// validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<String>,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl AccessClaims {
    /// Build access claims expiring [`ACCESS_TOKEN_TTL_MINUTES`] from now.
    pub fn new(username: impl Into<String>, email: impl Into<String>, roles: BTreeSet<String>) -> Self {
        let expiration = Utc::now() + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES);

        Self {
            username: username.into(),
            email: email.into(),
            roles,
            exp: expiration.timestamp(),
        }
    }

    /// Check whether the claims are expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

/// Claim set carried by a refresh token.
///
/// Longer-lived than access claims; asserts only the username plus a
/// `type` marker so it cannot be presented where an access token is
/// expected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub username: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl RefreshClaims {
    /// Build refresh claims expiring [`REFRESH_TOKEN_TTL_DAYS`] from now.
    pub fn new(username: impl Into<String>) -> Self {
        let expiration = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        Self {
            username: username.into(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp(),
        }
    }

    /// Check whether the claims are expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
