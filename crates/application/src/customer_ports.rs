use async_trait::async_trait;

use pricetier_core::{AppResult, CustomerGroupId, CustomerId};
use pricetier_domain::{Customer, CustomerGroup, Metadata};

/// Input payload for creating a customer group.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomerGroup {
    /// Caller-chosen stable group identifier.
    pub id: CustomerGroupId,
    /// Display name.
    pub name: String,
    /// Initial group metadata.
    pub metadata: Metadata,
}

/// Input payload for creating a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    /// Customer identifier.
    pub id: CustomerId,
    /// Contact email.
    pub email: String,
    /// Initial metadata.
    pub metadata: Metadata,
}

/// Repository port over the customer and customer-group store.
///
/// Adapters report a missing customer, group or membership as
/// `AppError::NotFound` and an already existing group as `AppError::Conflict`.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Loads a customer together with its group memberships.
    async fn find_customer_with_groups(
        &self,
        customer_id: &CustomerId,
    ) -> AppResult<Option<Customer>>;

    /// Loads a customer group.
    async fn find_group(&self, group_id: &CustomerGroupId) -> AppResult<Option<CustomerGroup>>;

    /// Creates a customer group. Fails with `Conflict` when the id is taken.
    async fn create_group(&self, group: NewCustomerGroup) -> AppResult<CustomerGroup>;

    /// Adds a customer to a group. Adding an existing member is a no-op.
    async fn add_customer_to_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()>;

    /// Removes a customer from a group. Fails with `NotFound` for non-members.
    async fn remove_customer_from_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()>;

    /// Merges `patch` into the customer's metadata, keeping unrelated keys.
    async fn merge_customer_metadata(
        &self,
        customer_id: &CustomerId,
        patch: Metadata,
    ) -> AppResult<()>;

    /// Creates a customer without group memberships.
    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer>;

    /// Deletes a customer and its memberships.
    async fn delete_customer(&self, customer_id: &CustomerId) -> AppResult<()>;
}
