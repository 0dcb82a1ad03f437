//! PostgreSQL-backed auth identity repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use pricetier_application::{
    AuthIdentity, AuthIdentityRepository, EMAIL_PASSWORD_PROVIDER, NewAuthIdentity,
};
use pricetier_core::{AppError, AppResult, CustomerId};

/// PostgreSQL implementation of the auth identity repository port.
#[derive(Clone)]
pub struct PostgresAuthIdentityRepository {
    pool: PgPool,
}

impl PostgresAuthIdentityRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuthIdentityRow {
    id: String,
    customer_id: Option<String>,
    provider: String,
    entity_id: String,
    password_hash: Option<String>,
}

impl TryFrom<AuthIdentityRow> for AuthIdentity {
    type Error = AppError;

    fn try_from(row: AuthIdentityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id.map(CustomerId::new).transpose()?,
            provider: row.provider,
            entity_id: row.entity_id,
            password_hash: row.password_hash,
        })
    }
}

/// Email subjects are stored and matched lowercase.
pub(crate) fn normalized_entity_id(provider: &str, entity_id: &str) -> String {
    if provider == EMAIL_PASSWORD_PROVIDER {
        entity_id.trim().to_lowercase()
    } else {
        entity_id.to_owned()
    }
}

pub(crate) fn new_identity_id() -> String {
    format!("authid_{}", Uuid::new_v4().simple())
}

#[async_trait]
impl AuthIdentityRepository for PostgresAuthIdentityRepository {
    async fn list_for_customer(&self, customer_id: &CustomerId) -> AppResult<Vec<AuthIdentity>> {
        sqlx::query_as::<_, AuthIdentityRow>(
            r#"
            SELECT id, customer_id, provider, entity_id, password_hash
            FROM auth_identities
            WHERE customer_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(customer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list auth identities for customer '{customer_id}': {error}"
            ))
        })?
        .into_iter()
        .map(AuthIdentity::try_from)
        .collect()
    }

    async fn find_by_provider_entity(
        &self,
        provider: &str,
        entity_id: &str,
    ) -> AppResult<Option<AuthIdentity>> {
        sqlx::query_as::<_, AuthIdentityRow>(
            r#"
            SELECT id, customer_id, provider, entity_id, password_hash
            FROM auth_identities
            WHERE provider = $1 AND entity_id = $2
            "#,
        )
        .bind(provider)
        .bind(normalized_entity_id(provider, entity_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find auth identity for provider '{provider}': {error}"
            ))
        })?
        .map(AuthIdentity::try_from)
        .transpose()
    }

    async fn create(&self, identity: NewAuthIdentity) -> AppResult<AuthIdentity> {
        sqlx::query_as::<_, AuthIdentityRow>(
            r#"
            INSERT INTO auth_identities (id, customer_id, provider, entity_id, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, provider, entity_id, password_hash
            "#,
        )
        .bind(new_identity_id())
        .bind(identity.customer_id.as_str())
        .bind(identity.provider.as_str())
        .bind(normalized_entity_id(
            identity.provider.as_str(),
            identity.entity_id.as_str(),
        ))
        .bind(identity.password_hash.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!(
                    "an auth identity for provider '{}' and this subject already exists",
                    identity.provider
                ));
            }
            AppError::Internal(format!(
                "failed to create auth identity for customer '{}': {error}",
                identity.customer_id
            ))
        })?
        .try_into()
    }

    async fn update_password_hash(
        &self,
        identity_id: &str,
        password_hash: &str,
    ) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE auth_identities
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(identity_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update password of auth identity '{identity_id}': {error}"
            ))
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "auth identity '{identity_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn delete(&self, identity_id: &str) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM auth_identities
            WHERE id = $1
            "#,
        )
        .bind(identity_id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete auth identity '{identity_id}': {error}"
            ))
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "auth identity '{identity_id}' was not found"
            )));
        }

        Ok(())
    }
}
