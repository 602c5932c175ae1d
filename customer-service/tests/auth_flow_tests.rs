mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use auth::token::claims::ACCESS_TOKEN_TTL_MINUTES;
use auth::token::claims::REFRESH_TOKEN_TTL_DAYS;
use auth::TokenIssuer;
use chrono::Utc;
use common::InMemoryCustomerRepository;
use customer_service::customer::errors::AuthError;
use customer_service::customer::models::Customer;
use customer_service::customer::models::CustomerId;
use customer_service::customer::models::EmailAddress;
use customer_service::customer::models::RegisterCustomerCommand;
use customer_service::customer::models::Username;
use customer_service::customer::ports::AuthenticationServicePort;
use customer_service::customer::ports::CustomerRepository;
use customer_service::customer::service::AuthenticationService;

const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

fn test_service() -> (
    AuthenticationService<InMemoryCustomerRepository>,
    Arc<InMemoryCustomerRepository>,
    Arc<TokenIssuer>,
) {
    let repository = Arc::new(InMemoryCustomerRepository::with_default_roles());
    let token_issuer = Arc::new(TokenIssuer::new(SECRET));
    let service = AuthenticationService::new(Arc::clone(&repository), Arc::clone(&token_issuer));
    (service, repository, token_issuer)
}

fn register_command(username: &str, email: &str, password: &str) -> RegisterCustomerCommand {
    RegisterCustomerCommand::new(
        Username::new(username.to_string()).unwrap(),
        EmailAddress::new(email.to_string()).unwrap(),
        "Test".to_string(),
        "Customer".to_string(),
        password.to_string(),
    )
}

#[tokio::test]
async fn test_register_assigns_defaults_and_default_role() {
    let (service, _, _) = test_service();

    let created = service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");

    assert!(created.active);
    assert!(!created.member);
    assert_eq!(created.membership_discount, 0.0);
    assert!(created.last_login.is_none());
    assert_eq!(created.roles, BTreeSet::from(["USER".to_string()]));
    assert!(created.password_hash.starts_with("$2b$"));
}

#[tokio::test]
async fn test_register_without_role_catalog_still_succeeds() {
    let repository = Arc::new(InMemoryCustomerRepository::new());
    let token_issuer = Arc::new(TokenIssuer::new(SECRET));
    let service = AuthenticationService::new(Arc::clone(&repository), token_issuer);

    let created = service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");

    assert!(created.roles.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (service, _, _) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("first registration failed");

    let result = service
        .register(register_command("alice", "other@example.com", "Valid123!"))
        .await;

    assert!(matches!(result, Err(AuthError::DuplicateUsername(u)) if u == "alice"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (service, _, _) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("first registration failed");

    let result = service
        .register(register_command("bob", "alice@example.com", "Valid123!"))
        .await;

    assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
}

#[tokio::test]
async fn test_register_weak_password() {
    let (service, _, _) = test_service();

    let result = service
        .register(register_command("alice", "alice@example.com", "NoSpecial1"))
        .await;

    assert!(matches!(result, Err(AuthError::WeakPassword)));
}

#[tokio::test]
async fn test_login_updates_last_login_monotonically() {
    let (service, _, _) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");

    let first = service
        .login("alice", "Valid123!")
        .await
        .expect("first login failed");
    let first_login = first.customer.last_login.expect("last_login not set");

    tokio::time::sleep(Duration::from_millis(20)).await;

    let second = service
        .login("alice", "Valid123!")
        .await
        .expect("second login failed");
    let second_login = second.customer.last_login.expect("last_login not set");

    assert!(second_login > first_login);
}

#[tokio::test]
async fn test_login_wrong_password_leaves_last_login_unchanged() {
    let (service, repository, _) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");

    let result = service.login("alice", "Wrong456!").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    let stored = repository
        .find_by_username("alice")
        .await
        .unwrap()
        .expect("customer missing");
    assert!(stored.last_login.is_none());
}

#[tokio::test]
async fn test_login_deactivated_account() {
    let (service, repository, _) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");
    repository.deactivate("alice");

    // Correct password, but the account is inactive
    let result = service.login("alice", "Valid123!").await;

    assert!(matches!(result, Err(AuthError::NotFoundOrInactive)));
}

#[tokio::test]
async fn test_issued_token_expiry_windows() {
    let (service, _, token_issuer) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");

    let response = service
        .login("alice", "Valid123!")
        .await
        .expect("login failed");
    // Tokens were issued immediately before login returned
    let issued_at = Utc::now().timestamp();

    let access = token_issuer
        .decode_access_token(&response.access_token)
        .expect("access token did not decode");
    let refresh = token_issuer
        .decode_refresh_token(&response.refresh_token)
        .expect("refresh token did not decode");

    let expected_access = issued_at + ACCESS_TOKEN_TTL_MINUTES * 60;
    let expected_refresh = issued_at + REFRESH_TOKEN_TTL_DAYS * 24 * 60 * 60;
    assert!((access.exp - expected_access).abs() <= 1);
    assert!((refresh.exp - expected_refresh).abs() <= 1);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let (service, repository, token_issuer) = test_service();

    service
        .register(register_command("alice", "alice@example.com", "Valid123!"))
        .await
        .expect("registration failed");
    let response = service
        .login("alice", "Valid123!")
        .await
        .expect("login failed");

    // A valid refresh token mints a fresh access token
    let access_token = service
        .refresh_token(&response.refresh_token)
        .await
        .expect("refresh failed");
    let claims = token_issuer
        .decode_access_token(&access_token)
        .expect("reissued token did not decode");
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.roles, BTreeSet::from(["USER".to_string()]));

    // An access token is not accepted in its place
    let result = service.refresh_token(&response.access_token).await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    // Deactivation cuts off refresh as well
    repository.deactivate("alice");
    let result = service.refresh_token(&response.refresh_token).await;
    assert!(matches!(result, Err(AuthError::NotFoundOrInactive)));
}

#[tokio::test]
async fn test_store_rejects_duplicates_without_pre_checks() {
    // The store's uniqueness guard holds even when the orchestrator's
    // pre-checks are bypassed, as happens when two registrations race.
    let repository = InMemoryCustomerRepository::with_default_roles();

    let customer = Customer {
        id: CustomerId::new(),
        username: Username::new("alice".to_string()).unwrap(),
        email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
        first_name: "Alice".to_string(),
        last_name: "Archer".to_string(),
        phone: None,
        address: None,
        password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        active: true,
        member: false,
        membership_discount: 0.0,
        last_login: None,
        created_at: Utc::now(),
        roles: BTreeSet::new(),
    };

    repository
        .create(customer.clone())
        .await
        .expect("first insert failed");

    let mut duplicate_username = customer.clone();
    duplicate_username.id = CustomerId::new();
    duplicate_username.email = EmailAddress::new("other@example.com".to_string()).unwrap();
    let result = repository.create(duplicate_username).await;
    assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));

    let mut duplicate_email = customer.clone();
    duplicate_email.id = CustomerId::new();
    duplicate_email.username = Username::new("bob".to_string()).unwrap();
    let result = repository.create(duplicate_email).await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
}
