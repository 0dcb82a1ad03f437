use async_trait::async_trait;

use pricetier_core::{AppResult, CustomerId};

/// Provider name for email and password credentials.
pub const EMAIL_PASSWORD_PROVIDER: &str = "emailpass";

/// Login identity linked to a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Stable identity identifier.
    pub id: String,
    /// Linked customer, if the identity has been attached to one.
    pub customer_id: Option<CustomerId>,
    /// Credential provider (for example `emailpass`).
    pub provider: String,
    /// Provider-scoped subject, the lowercase email for `emailpass`.
    pub entity_id: String,
    /// Password hash for password-based providers.
    pub password_hash: Option<String>,
}

/// Input payload for creating a login identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthIdentity {
    /// Customer the identity belongs to.
    pub customer_id: CustomerId,
    /// Credential provider.
    pub provider: String,
    /// Provider-scoped subject.
    pub entity_id: String,
    /// Password hash for password-based providers.
    pub password_hash: Option<String>,
}

/// Repository port for customer login identities.
#[async_trait]
pub trait AuthIdentityRepository: Send + Sync {
    /// Lists identities linked to a customer.
    async fn list_for_customer(&self, customer_id: &CustomerId) -> AppResult<Vec<AuthIdentity>>;

    /// Finds an identity by provider and provider-scoped subject.
    async fn find_by_provider_entity(
        &self,
        provider: &str,
        entity_id: &str,
    ) -> AppResult<Option<AuthIdentity>>;

    /// Creates an identity.
    async fn create(&self, identity: NewAuthIdentity) -> AppResult<AuthIdentity>;

    /// Replaces the stored password hash of an identity.
    async fn update_password_hash(&self, identity_id: &str, password_hash: &str)
    -> AppResult<()>;

    /// Deletes an identity.
    async fn delete(&self, identity_id: &str) -> AppResult<()>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
