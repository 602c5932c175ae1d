use super::errors::PasswordError;

/// Bcrypt cost factor used for stored password hashes.
///
/// Higher values are slower to compute and to attack.
pub const BCRYPT_COST: u32 = 12;

/// Password hashing implementation.
///
/// Wraps bcrypt with random salt generation; the salt and cost factor are
/// embedded in the produced hash string, so verification needs no state
/// beyond the hash itself.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the production cost factor ([`BCRYPT_COST`]).
    pub fn new() -> Self {
        Self { cost: BCRYPT_COST }
    }

    /// Create a hasher with an explicit cost factor.
    ///
    /// Tests use a low cost to keep hashing fast; production code should
    /// stick with [`PasswordHasher::new`].
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Self-describing bcrypt hash string (`$2b$…`, salt embedded)
    ///
    /// # Errors
    /// * `EmptyPassword` - Empty input is rejected explicitly
    /// * `HashingFailed` - Bcrypt operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// Recomputes with the salt embedded in `hash`; the underlying bcrypt
    /// comparison is constant-time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash string
    ///
    /// # Returns
    /// True iff the password matches. Any mismatch, malformed hash, or
    /// empty password yields false; this method never fails.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.is_empty() {
            return false;
        }

        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
