//! Administrative customer account operations.
//!
//! Covers the destructive and credential-related actions exposed to store
//! administrators: deleting a customer together with its login identities
//! and resetting a customer's email/password credential.

use std::sync::Arc;

use pricetier_core::{AppError, AppResult, CustomerId};
use pricetier_domain::{Customer, validate_customer_password};
use tracing::{error, info, warn};

use crate::{
    AuthIdentity, AuthIdentityRepository, CustomerRepository, EMAIL_PASSWORD_PROVIDER,
    NewAuthIdentity, PasswordHasher,
};

/// Result of deleting a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedCustomer {
    /// Identifier of the deleted customer.
    pub customer_id: CustomerId,
    /// Email the customer was registered with.
    pub email: String,
    /// Number of login identities removed alongside the customer.
    pub removed_identities: usize,
}

/// How a password reset was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordResetOutcome {
    /// An existing email/password identity received the new hash.
    Updated,
    /// No identity existed, so one was created for the customer.
    Created,
}

/// Application service for administrator customer actions.
#[derive(Clone)]
pub struct CustomerAdminService {
    customers: Arc<dyn CustomerRepository>,
    identities: Arc<dyn AuthIdentityRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl CustomerAdminService {
    /// Creates a new admin service.
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        identities: Arc<dyn AuthIdentityRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            customers,
            identities,
            password_hasher,
        }
    }

    /// Deletes a customer and its login identities.
    ///
    /// Identity cleanup is best effort: failures are logged and the customer
    /// is deleted regardless.
    pub async fn delete_customer(&self, customer_id: &CustomerId) -> AppResult<DeletedCustomer> {
        let customer = self.load_customer(customer_id).await?;

        let mut removed_identities = 0;
        match self.identities.list_for_customer(customer_id).await {
            Ok(identities) => {
                for identity in identities {
                    match self.identities.delete(identity.id.as_str()).await {
                        Ok(()) => removed_identities += 1,
                        Err(error) => warn!(
                            customer_id = %customer_id,
                            identity_id = %identity.id,
                            error = %error,
                            "failed to delete auth identity"
                        ),
                    }
                }
            }
            Err(error) => warn!(
                customer_id = %customer_id,
                error = %error,
                "failed to list auth identities before customer deletion"
            ),
        }

        self.customers.delete_customer(customer_id).await?;
        info!(
            customer_id = %customer_id,
            removed_identities,
            "deleted customer"
        );

        Ok(DeletedCustomer {
            customer_id: customer_id.clone(),
            email: customer.email().to_owned(),
            removed_identities,
        })
    }

    /// Sets a new password on the customer's email/password identity.
    ///
    /// The identity linked to the customer is preferred. Otherwise an
    /// identity registered under the customer's email is reused, and failing
    /// that a new one is created.
    pub async fn reset_password(
        &self,
        customer_id: &CustomerId,
        password: &str,
    ) -> AppResult<PasswordResetOutcome> {
        validate_customer_password(password)?;
        let customer = self.load_customer(customer_id).await?;

        self.write_password(&customer, password)
            .await
            .map_err(|failure| {
                error!(
                    customer_id = %customer_id,
                    error = %failure,
                    "failed to update customer password"
                );
                AppError::UnexpectedState("failed to update password".to_owned())
            })
    }

    async fn write_password(
        &self,
        customer: &Customer,
        password: &str,
    ) -> AppResult<PasswordResetOutcome> {
        let password_hash = self.password_hasher.hash_password(password)?;

        if let Some(identity) = self.find_password_identity(customer).await? {
            self.identities
                .update_password_hash(identity.id.as_str(), password_hash.as_str())
                .await?;
            info!(customer_id = %customer.id(), "updated customer password");
            return Ok(PasswordResetOutcome::Updated);
        }

        if customer.login_email().is_empty() {
            return Err(AppError::InvalidArgument(
                "customer has no email to attach a password identity to".to_owned(),
            ));
        }

        self.identities
            .create(NewAuthIdentity {
                customer_id: customer.id().clone(),
                provider: EMAIL_PASSWORD_PROVIDER.to_owned(),
                entity_id: customer.login_email(),
                password_hash: Some(password_hash),
            })
            .await?;
        info!(customer_id = %customer.id(), "created password identity for customer");

        Ok(PasswordResetOutcome::Created)
    }

    async fn find_password_identity(&self, customer: &Customer) -> AppResult<Option<AuthIdentity>> {
        let linked = self
            .identities
            .list_for_customer(customer.id())
            .await?
            .into_iter()
            .find(|identity| identity.provider == EMAIL_PASSWORD_PROVIDER);
        if linked.is_some() {
            return Ok(linked);
        }

        self.identities
            .find_by_provider_entity(EMAIL_PASSWORD_PROVIDER, customer.login_email().as_str())
            .await
    }

    async fn load_customer(&self, customer_id: &CustomerId) -> AppResult<Customer> {
        self.customers
            .find_customer_with_groups(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer '{customer_id}' was not found")))
    }
}
