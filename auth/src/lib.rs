//! Authentication utilities library
//!
//! Provides reusable credential infrastructure for the bookstore backend:
//! - Password strength policy
//! - Password hashing (bcrypt)
//! - Signed access and refresh token issuance
//!
//! Each service defines its own orchestration on top of these leaves.
//! This crate performs no I/O and holds no state beyond its configuration.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4); // low cost for doc tests
//! let hash = hasher.hash("Valid123!").unwrap();
//! assert!(hasher.verify("Valid123!", &hash));
//! assert!(!hasher.verify("Wrong456!", &hash));
//! ```
//!
//! ## Password Policy
//! ```
//! use auth::password::policy;
//!
//! assert!(policy::is_strong("Valid123!"));
//! assert!(!policy::is_strong("short1!"));
//! ```
//!
//! ## Tokens
//! ```
//! use std::collections::BTreeSet;
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let roles = BTreeSet::from(["USER".to_string()]);
//!
//! let token = issuer
//!     .issue_access_token("alice", "alice@example.com", &roles)
//!     .unwrap();
//! let claims = issuer.decode_access_token(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! assert_eq!(claims.roles, roles);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessClaims;
pub use token::RefreshClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
