use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::customer::errors::AuthError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Role;
use crate::domain::customer::models::Username;
use crate::domain::customer::ports::CustomerRepository;

const SELECT_CUSTOMER: &str = r#"
    SELECT id, username, first_name, last_name, email, password_hash,
           phone, address, active, member, membership_discount,
           last_login, created_at
    FROM customers
"#;

/// PostgreSQL implementation of the credential store.
///
/// The unique indexes on `customers.username` and `customers.email` are
/// the authoritative duplicate guard; violations are mapped onto the
/// `Duplicate*` error outcomes by constraint name.
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_column(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<Customer>, AuthError> {
        let query = format!("{} WHERE {} = $1", SELECT_CUSTOMER, condition);

        let row = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(row) => {
                let roles = self.load_role_names(row.id).await?;
                Ok(Some(row.into_customer(roles)?))
            }
            None => Ok(None),
        }
    }

    async fn load_role_names(&self, customer_id: Uuid) -> Result<BTreeSet<String>, AuthError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM roles r
            JOIN customer_roles cr ON cr.role_id = r.id
            WHERE cr.customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(names.into_iter().collect())
    }

    fn map_unique_violation(e: sqlx::Error, customer: &Customer) -> AuthError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                if db_err.constraint() == Some("customers_username_key") {
                    return AuthError::DuplicateUsername(customer.username.to_string());
                }
                if db_err.constraint() == Some("customers_email_key") {
                    return AuthError::DuplicateEmail(customer.email.to_string());
                }
            }
        }
        AuthError::StoreUnavailable(e.to_string())
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AuthError> {
        self.find_by_column("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AuthError> {
        self.find_by_column("email", email).await
    }

    async fn create(&self, customer: Customer) -> Result<Customer, AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, username, first_name, last_name, email,
                                   password_hash, phone, address, active, member,
                                   membership_discount, last_login, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(customer.id.0)
        .bind(customer.username.as_str())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.email.as_str())
        .bind(&customer.password_hash)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.active)
        .bind(customer.member)
        .bind(customer.membership_discount)
        .bind(customer.last_login)
        .bind(customer.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, &customer))?;

        // Role names missing from the catalog are skipped, matching the
        // best-effort role attachment at registration.
        for role_name in &customer.roles {
            sqlx::query(
                r#"
                INSERT INTO customer_roles (customer_id, role_id)
                SELECT $1, id FROM roles WHERE name = $2
                "#,
            )
            .bind(customer.id.0)
            .bind(role_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> Result<Customer, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET username = $2, first_name = $3, last_name = $4, email = $5,
                password_hash = $6, phone = $7, address = $8, active = $9,
                member = $10, membership_discount = $11, last_login = $12
            WHERE id = $1
            "#,
        )
        .bind(customer.id.0)
        .bind(customer.username.as_str())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.email.as_str())
        .bind(&customer.password_hash)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.active)
        .bind(customer.member)
        .bind(customer.membership_discount)
        .bind(customer.last_login)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &customer))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFoundOrInactive);
        }

        Ok(customer)
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, description
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(row.map(|r| Role {
            name: r.name,
            description: r.description,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    phone: Option<String>,
    address: Option<String>,
    active: bool,
    member: bool,
    membership_discount: f64,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, roles: BTreeSet<String>) -> Result<Customer, AuthError> {
        Ok(Customer {
            id: CustomerId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            password_hash: self.password_hash,
            active: self.active,
            member: self.member,
            membership_discount: self.membership_discount,
            last_login: self.last_login,
            created_at: self.created_at,
            roles,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    name: String,
    description: Option<String>,
}
