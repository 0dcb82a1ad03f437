use std::collections::BTreeMap;

use async_trait::async_trait;
use pricetier_application::{AuthIdentity, AuthIdentityRepository, NewAuthIdentity};
use pricetier_core::{AppError, AppResult, CustomerId};
use tokio::sync::RwLock;

use crate::postgres_auth_identity_repository::{new_identity_id, normalized_entity_id};

/// In-memory auth identity repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryAuthIdentityRepository {
    identities: RwLock<BTreeMap<String, AuthIdentity>>,
}

impl InMemoryAuthIdentityRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthIdentityRepository for InMemoryAuthIdentityRepository {
    async fn list_for_customer(&self, customer_id: &CustomerId) -> AppResult<Vec<AuthIdentity>> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .filter(|identity| identity.customer_id.as_ref() == Some(customer_id))
            .cloned()
            .collect())
    }

    async fn find_by_provider_entity(
        &self,
        provider: &str,
        entity_id: &str,
    ) -> AppResult<Option<AuthIdentity>> {
        let entity_id = normalized_entity_id(provider, entity_id);
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.provider == provider && identity.entity_id == entity_id)
            .cloned())
    }

    async fn create(&self, identity: NewAuthIdentity) -> AppResult<AuthIdentity> {
        let entity_id = normalized_entity_id(identity.provider.as_str(), &identity.entity_id);
        let mut identities = self.identities.write().await;

        if identities
            .values()
            .any(|stored| stored.provider == identity.provider && stored.entity_id == entity_id)
        {
            return Err(AppError::Conflict(format!(
                "an auth identity for provider '{}' and this subject already exists",
                identity.provider
            )));
        }

        let created = AuthIdentity {
            id: new_identity_id(),
            customer_id: Some(identity.customer_id),
            provider: identity.provider,
            entity_id,
            password_hash: identity.password_hash,
        };
        identities.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update_password_hash(
        &self,
        identity_id: &str,
        password_hash: &str,
    ) -> AppResult<()> {
        let mut identities = self.identities.write().await;
        let identity = identities.get_mut(identity_id).ok_or_else(|| {
            AppError::NotFound(format!("auth identity '{identity_id}' was not found"))
        })?;

        identity.password_hash = Some(password_hash.to_owned());
        Ok(())
    }

    async fn delete(&self, identity_id: &str) -> AppResult<()> {
        self.identities
            .write()
            .await
            .remove(identity_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("auth identity '{identity_id}' was not found")))
    }
}
