use std::collections::BTreeSet;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::claims::AccessClaims;
use super::claims::RefreshClaims;
use super::claims::REFRESH_TOKEN_TYPE;
use super::errors::TokenError;

/// Issues and validates access and refresh tokens.
///
/// Every token is signed with HMAC-SHA256 over its claim set; decoding
/// verifies the signature and the expiry before returning claims. Refresh
/// tokens are not persisted anywhere, and no cryptographic binding exists
/// between an access token and the refresh token issued alongside it.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    /// Create a token issuer from a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue an access token for an authenticated user.
    ///
    /// # Arguments
    /// * `username` - Authenticated username
    /// * `email` - User's email address
    /// * `roles` - Role names granted to the user
    ///
    /// # Returns
    /// Signed token whose claims expire 15 minutes from issuance
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_access_token(
        &self,
        username: &str,
        email: &str,
        roles: &BTreeSet<String>,
    ) -> Result<String, TokenError> {
        self.encode(&AccessClaims::new(username, email, roles.clone()))
    }

    /// Issue a refresh token for an authenticated user.
    ///
    /// # Arguments
    /// * `username` - Authenticated username
    ///
    /// # Returns
    /// Signed token whose claims expire 7 days from issuance
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_refresh_token(&self, username: &str) -> Result<String, TokenError> {
        self.encode(&RefreshClaims::new(username))
    }

    /// Decode and validate an access token.
    ///
    /// # Errors
    /// * `TokenExpired` - The expiry claim is in the past
    /// * `DecodingFailed` - Signature invalid or token malformed
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.decode(token)
    }

    /// Decode and validate a refresh token.
    ///
    /// Beyond signature and expiry, the `type` claim must mark the token
    /// as a refresh token; access tokens are rejected here.
    ///
    /// # Errors
    /// * `TokenExpired` - The expiry claim is in the past
    /// * `DecodingFailed` - Signature invalid or token malformed
    /// * `WrongTokenType` - The `type` claim is not `"refresh"`
    pub fn decode_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode(token)?;

        if claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(TokenError::WrongTokenType(claims.token_type));
        }

        Ok(claims)
    }

    fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<T>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::DecodingFailed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
