use std::collections::HashMap;

use async_trait::async_trait;
use pricetier_application::{CustomerRepository, NewCustomer, NewCustomerGroup};
use pricetier_core::{AppError, AppResult, CustomerGroupId, CustomerId};
use pricetier_domain::{Customer, CustomerGroup, Metadata, merge_metadata};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CustomerEntry {
    email: String,
    metadata: Metadata,
    group_ids: Vec<CustomerGroupId>,
}

/// In-memory customer repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<CustomerId, CustomerEntry>>,
    groups: RwLock<HashMap<CustomerGroupId, CustomerGroup>>,
}

impl InMemoryCustomerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_customer_with_groups(
        &self,
        customer_id: &CustomerId,
    ) -> AppResult<Option<Customer>> {
        let customers = self.customers.read().await;
        let Some(entry) = customers.get(customer_id) else {
            return Ok(None);
        };

        let groups = self.groups.read().await;
        let member_groups = entry
            .group_ids
            .iter()
            .filter_map(|group_id| groups.get(group_id).cloned())
            .collect();

        Ok(Some(Customer::new(
            customer_id.clone(),
            entry.email.clone(),
            entry.metadata.clone(),
            member_groups,
        )))
    }

    async fn find_group(&self, group_id: &CustomerGroupId) -> AppResult<Option<CustomerGroup>> {
        Ok(self.groups.read().await.get(group_id).cloned())
    }

    async fn create_group(&self, group: NewCustomerGroup) -> AppResult<CustomerGroup> {
        let mut groups = self.groups.write().await;

        if groups.contains_key(&group.id) {
            return Err(AppError::Conflict(format!(
                "customer group '{}' already exists",
                group.id
            )));
        }

        let created = CustomerGroup::new(group.id.clone(), group.name, group.metadata);
        groups.insert(group.id, created.clone());
        Ok(created)
    }

    async fn add_customer_to_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        if !self.groups.read().await.contains_key(group_id) {
            return Err(AppError::NotFound(format!(
                "customer group '{group_id}' was not found"
            )));
        }

        let mut customers = self.customers.write().await;
        let entry = customers.get_mut(customer_id).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;

        if !entry.group_ids.contains(group_id) {
            entry.group_ids.push(group_id.clone());
        }

        Ok(())
    }

    async fn remove_customer_from_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        let mut customers = self.customers.write().await;
        let entry = customers.get_mut(customer_id).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;

        let Some(position) = entry.group_ids.iter().position(|stored| stored == group_id) else {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' is not a member of group '{group_id}'"
            )));
        };
        entry.group_ids.remove(position);

        Ok(())
    }

    async fn merge_customer_metadata(
        &self,
        customer_id: &CustomerId,
        patch: Metadata,
    ) -> AppResult<()> {
        let mut customers = self.customers.write().await;
        let entry = customers.get_mut(customer_id).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;

        merge_metadata(&mut entry.metadata, patch);
        Ok(())
    }

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer> {
        let mut customers = self.customers.write().await;

        if customers.contains_key(&customer.id) {
            return Err(AppError::Conflict(format!(
                "customer '{}' already exists",
                customer.id
            )));
        }

        customers.insert(
            customer.id.clone(),
            CustomerEntry {
                email: customer.email.clone(),
                metadata: customer.metadata.clone(),
                group_ids: Vec::new(),
            },
        );

        Ok(Customer::new(
            customer.id,
            customer.email,
            customer.metadata,
            Vec::new(),
        ))
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> AppResult<()> {
        self.customers
            .write()
            .await
            .remove(customer_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("customer '{customer_id}' was not found")))
    }
}
