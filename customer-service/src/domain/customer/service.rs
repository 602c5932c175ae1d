use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use auth::password::policy;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::customer::errors::AuthError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::LoginResponse;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::ports::AuthenticationServicePort;
use crate::domain::customer::ports::CustomerRepository;

/// Role attached to every new registration when present in the catalog.
pub const DEFAULT_ROLE: &str = "USER";

/// Authentication orchestrator.
///
/// Composes the credential store, the password hasher, and the token
/// issuer into the login, register, and token-refresh use cases. Holds no
/// mutable state of its own; every call is an independent unit of work.
pub struct AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    repository: Arc<CR>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
}

impl<CR> AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `token_issuer` - Shared token issuer
    pub fn new(repository: Arc<CR>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }

    /// Hash a password on the blocking pool.
    ///
    /// Hashing is CPU-bound and deliberately slow; a worker thread keeps
    /// the bcrypt cost from stalling unrelated tasks on the async runtime.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("blocking task failed: {}", e)))??;

        Ok(hash)
    }

    /// Verify a password against a stored hash on the blocking pool.
    async fn verify_password(&self, password: String, stored_hash: String) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("blocking task failed: {}", e)))?;

        Ok(matches)
    }
}

#[async_trait]
impl<CR> AuthenticationServicePort for AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let mut customer = self
            .repository
            .find_by_username(username)
            .await?
            .filter(|customer| customer.active)
            .ok_or(AuthError::NotFoundOrInactive)?;

        let password_matches = self
            .verify_password(password.to_string(), customer.password_hash.clone())
            .await?;

        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        customer.last_login = Some(Utc::now());
        let customer = self.repository.update(customer).await?;

        let access_token = self.token_issuer.issue_access_token(
            customer.username.as_str(),
            customer.email.as_str(),
            &customer.roles,
        )?;
        let refresh_token = self
            .token_issuer
            .issue_refresh_token(customer.username.as_str())?;

        tracing::debug!(username = %customer.username, "customer logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
            customer,
        })
    }

    async fn register(&self, command: RegisterCustomerCommand) -> Result<Customer, AuthError> {
        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername(command.username.to_string()));
        }

        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateEmail(command.email.to_string()));
        }

        if !policy::is_strong(&command.password) {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = self.hash_password(command.password).await?;

        // Best effort: an absent catalog entry leaves the role set empty
        let mut roles = BTreeSet::new();
        if let Some(role) = self.repository.find_role_by_name(DEFAULT_ROLE).await? {
            roles.insert(role.name);
        }

        let customer = Customer {
            id: CustomerId::new(),
            username: command.username,
            email: command.email,
            first_name: command.first_name,
            last_name: command.last_name,
            phone: command.phone,
            address: command.address,
            password_hash,
            active: true,
            member: false,
            membership_discount: 0.0,
            last_login: None,
            created_at: Utc::now(),
            roles,
        };

        // The duplicate pre-checks above are an optimization; the store's
        // unique indexes decide races and surface here as Duplicate* errors.
        let created = self.repository.create(customer).await?;

        tracing::info!(username = %created.username, "customer registered");

        Ok(created)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .token_issuer
            .decode_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let customer = self
            .repository
            .find_by_username(&claims.username)
            .await?
            .filter(|customer| customer.active)
            .ok_or(AuthError::NotFoundOrInactive)?;

        let access_token = self.token_issuer.issue_access_token(
            customer.username.as_str(),
            customer.email.as_str(),
            &customer.roles,
        )?;

        tracing::debug!(username = %customer.username, "access token refreshed");

        Ok(access_token)
    }
}
