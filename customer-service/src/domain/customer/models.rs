use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::customer::errors::EmailError;
use crate::domain::customer::errors::UsernameError;

/// Customer aggregate entity.
///
/// The user record held by the credential store. The password hash is
/// opaque to everything but the hasher, and the entity deliberately does
/// not implement `Serialize`: outward projections are built by the calling
/// boundary and never include the hash.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    /// Inactive accounts cannot authenticate.
    pub active: bool,
    pub member: bool,
    pub membership_discount: f64,
    /// Set exactly once per successful login; never decreases.
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Role names resolved from the role catalog at registration.
    pub roles: BTreeSet<String>,
}

/// Customer unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    /// Generate a new random customer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-50 characters and contains only alphanumeric,
/// underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates RFC 5322 format and the 255-character storage limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `TooLong` - Email exceeds 255 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: email.len(),
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role catalog record.
///
/// Customers reference roles by name only; roles do not reference
/// customers back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    pub description: Option<String>,
}

/// Command to register a new customer with validated identity fields.
#[derive(Debug)]
pub struct RegisterCustomerCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    /// Plain text password; hashed by the service, never stored.
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl RegisterCustomerCommand {
    pub fn new(
        username: Username,
        email: EmailAddress,
        first_name: String,
        last_name: String,
        password: String,
    ) -> Self {
        Self {
            username,
            email,
            first_name,
            last_name,
            password,
            phone: None,
            address: None,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Short-lived token asserting identity and roles.
    pub access_token: String,
    /// Longer-lived token for minting new access tokens.
    pub refresh_token: String,
    pub customer: Customer,
}
