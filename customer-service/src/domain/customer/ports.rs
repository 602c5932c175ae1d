use async_trait::async_trait;

use crate::domain::customer::errors::AuthError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::LoginResponse;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::models::Role;

/// Port for the authentication use cases.
///
/// The inbound boundary (an HTTP layer, outside this crate) depends on
/// this trait; each method returns either a success payload or one of the
/// named [`AuthError`] outcomes.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Authenticate a customer by username and password.
    ///
    /// On success `last_login` is updated and persisted, and fresh access
    /// and refresh tokens are issued.
    ///
    /// # Errors
    /// * `NotFoundOrInactive` - No such username, or the account is deactivated
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Credential store failure
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Register a new customer.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DuplicateEmail` - Email is already registered
    /// * `WeakPassword` - Password fails the strength policy
    /// * `StoreUnavailable` - Credential store failure
    async fn register(&self, command: RegisterCustomerCommand) -> Result<Customer, AuthError>;

    /// Mint a fresh access token from a valid refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Token is expired, tampered with, or not a refresh token
    /// * `NotFoundOrInactive` - The named customer no longer exists or is deactivated
    /// * `StoreUnavailable` - Credential store failure
    async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError>;
}

/// Persistence operations for the customer aggregate and the role catalog.
///
/// The store's unique indexes on username and email are the authoritative
/// duplicate guard: `create` must surface a uniqueness violation as the
/// corresponding `Duplicate*` error rather than a generic store failure.
#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// Retrieve a customer by username.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AuthError>;

    /// Retrieve a customer by email address.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AuthError>;

    /// Persist a new customer.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Unique index violation on username
    /// * `DuplicateEmail` - Unique index violation on email
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, customer: Customer) -> Result<Customer, AuthError>;

    /// Update an existing customer.
    ///
    /// # Errors
    /// * `NotFoundOrInactive` - No customer with this id exists
    /// * `StoreUnavailable` - Store operation failed
    async fn update(&self, customer: Customer) -> Result<Customer, AuthError>;

    /// Look up a role in the role catalog.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;
}
