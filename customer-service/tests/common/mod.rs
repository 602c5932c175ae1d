use std::sync::Mutex;

use async_trait::async_trait;
use customer_service::customer::errors::AuthError;
use customer_service::customer::models::Customer;
use customer_service::customer::models::Role;
use customer_service::customer::ports::CustomerRepository;

/// In-memory credential store for end-to-end flow tests.
///
/// Enforces the same username/email uniqueness on insert as the
/// database's unique indexes, so orchestrator behavior is identical to
/// the PostgreSQL adapter's.
pub struct InMemoryCustomerRepository {
    customers: Mutex<Vec<Customer>>,
    roles: Mutex<Vec<Role>>,
}

impl InMemoryCustomerRepository {
    /// Store with an empty role catalog.
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(Vec::new()),
            roles: Mutex::new(Vec::new()),
        }
    }

    /// Store seeded with the default role catalog.
    pub fn with_default_roles() -> Self {
        Self {
            customers: Mutex::new(Vec::new()),
            roles: Mutex::new(vec![Role {
                name: "USER".to_string(),
                description: Some("Default customer role".to_string()),
            }]),
        }
    }

    /// Deactivate a customer's account directly in the store.
    pub fn deactivate(&self, username: &str) {
        let mut customers = self.customers.lock().unwrap();
        if let Some(customer) = customers
            .iter_mut()
            .find(|customer| customer.username.as_str() == username)
        {
            customer.active = false;
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AuthError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers
            .iter()
            .find(|customer| customer.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AuthError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers
            .iter()
            .find(|customer| customer.email.as_str() == email)
            .cloned())
    }

    async fn create(&self, customer: Customer) -> Result<Customer, AuthError> {
        let mut customers = self.customers.lock().unwrap();

        if customers
            .iter()
            .any(|existing| existing.username == customer.username)
        {
            return Err(AuthError::DuplicateUsername(customer.username.to_string()));
        }
        if customers
            .iter()
            .any(|existing| existing.email == customer.email)
        {
            return Err(AuthError::DuplicateEmail(customer.email.to_string()));
        }

        customers.push(customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> Result<Customer, AuthError> {
        let mut customers = self.customers.lock().unwrap();

        match customers.iter_mut().find(|existing| existing.id == customer.id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(customer)
            }
            None => Err(AuthError::NotFoundOrInactive),
        }
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles.iter().find(|role| role.name == name).cloned())
    }
}
