use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pricetier_core::{AppError, AppResult, CustomerGroupId, CustomerId};
use pricetier_domain::{Customer, CustomerGroup, Metadata, merge_metadata};

use crate::{CustomerRepository, NewCustomer, NewCustomerGroup};

#[derive(Debug, Clone)]
struct StoredCustomer {
    email: String,
    metadata: Metadata,
    group_ids: Vec<CustomerGroupId>,
}

/// Store operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FakeOperation {
    FindCustomer,
    FindGroup,
    AddToGroup,
    RemoveFromGroup,
    MergeMetadata,
    DeleteCustomer,
}

#[derive(Default)]
pub(crate) struct FakeCustomerRepository {
    customers: Mutex<HashMap<String, StoredCustomer>>,
    groups: Mutex<HashMap<String, CustomerGroup>>,
    failing_operations: Mutex<HashSet<FakeOperation>>,
    failing_group_creations: Mutex<HashSet<String>>,
    racing_group_creations: Mutex<HashSet<String>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

pub(crate) fn customer_id(value: &str) -> CustomerId {
    CustomerId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn group_id(value: &str) -> CustomerGroupId {
    CustomerGroupId::new(value).unwrap_or_else(|_| unreachable!())
}

impl FakeCustomerRepository {
    pub(crate) async fn insert_customer(&self, id: &str, metadata: Metadata, groups: &[&str]) {
        self.customers.lock().await.insert(
            id.to_owned(),
            StoredCustomer {
                email: format!("{id}@example.com"),
                metadata,
                group_ids: groups.iter().map(|group| group_id(group)).collect(),
            },
        );
    }

    pub(crate) async fn insert_group(&self, id: &str) {
        self.groups.lock().await.insert(
            id.to_owned(),
            CustomerGroup::new(group_id(id), id, Metadata::new()),
        );
    }

    pub(crate) async fn fail(&self, operation: FakeOperation) {
        self.failing_operations.lock().await.insert(operation);
    }

    pub(crate) async fn fail_group_creation(&self, id: &str) {
        self.failing_group_creations.lock().await.insert(id.to_owned());
    }

    /// Simulates another process creating the group between lookup and insert.
    pub(crate) async fn race_group_creation(&self, id: &str) {
        self.racing_group_creations.lock().await.insert(id.to_owned());
    }

    pub(crate) async fn group_ids_of(&self, id: &str) -> Vec<String> {
        self.customers
            .lock()
            .await
            .get(id)
            .map(|customer| {
                customer
                    .group_ids
                    .iter()
                    .map(|group| group.as_str().to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) async fn metadata_of(&self, id: &str) -> Metadata {
        self.customers
            .lock()
            .await
            .get(id)
            .map(|customer| customer.metadata.clone())
            .unwrap_or_default()
    }

    pub(crate) async fn has_group(&self, id: &str) -> bool {
        self.groups.lock().await.contains_key(id)
    }

    pub(crate) async fn has_customer(&self, id: &str) -> bool {
        self.customers.lock().await.contains_key(id)
    }

    async fn check(&self, operation: FakeOperation) -> AppResult<()> {
        if self.failing_operations.lock().await.contains(&operation) {
            return Err(AppError::Internal(format!(
                "store unavailable during {operation:?}"
            )));
        }
        Ok(())
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl CustomerRepository for FakeCustomerRepository {
    async fn find_customer_with_groups(
        &self,
        customer_id: &CustomerId,
    ) -> AppResult<Option<Customer>> {
        self.check(FakeOperation::FindCustomer).await?;
        let customers = self.customers.lock().await;
        let groups = self.groups.lock().await;

        Ok(customers.get(customer_id.as_str()).map(|stored| {
            let member_groups = stored
                .group_ids
                .iter()
                .map(|id| {
                    groups
                        .get(id.as_str())
                        .cloned()
                        .unwrap_or_else(|| CustomerGroup::new(id.clone(), id.as_str(), Metadata::new()))
                })
                .collect();
            Customer::new(
                customer_id.clone(),
                stored.email.clone(),
                stored.metadata.clone(),
                member_groups,
            )
        }))
    }

    async fn find_group(&self, group_id: &CustomerGroupId) -> AppResult<Option<CustomerGroup>> {
        self.check(FakeOperation::FindGroup).await?;
        Ok(self.groups.lock().await.get(group_id.as_str()).cloned())
    }

    async fn create_group(&self, group: NewCustomerGroup) -> AppResult<CustomerGroup> {
        let key = group.id.as_str().to_owned();
        self.record(format!("create_group:{key}")).await;

        if self.failing_group_creations.lock().await.contains(&key) {
            return Err(AppError::Internal(format!("failed to create group '{key}'")));
        }

        let mut groups = self.groups.lock().await;
        if self.racing_group_creations.lock().await.contains(&key) {
            groups.insert(
                key.clone(),
                CustomerGroup::new(group.id.clone(), group.name.clone(), Metadata::new()),
            );
        }
        if groups.contains_key(&key) {
            return Err(AppError::Conflict(format!("group '{key}' already exists")));
        }

        let created = CustomerGroup::new(group.id, group.name, group.metadata);
        groups.insert(key, created.clone());
        Ok(created)
    }

    async fn add_customer_to_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        self.record(format!("add:{group_id}")).await;
        self.check(FakeOperation::AddToGroup).await?;

        let mut customers = self.customers.lock().await;
        let customer = customers.get_mut(customer_id.as_str()).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;
        if !customer.group_ids.contains(group_id) {
            customer.group_ids.push(group_id.clone());
        }
        Ok(())
    }

    async fn remove_customer_from_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        self.record(format!("remove:{group_id}")).await;
        self.check(FakeOperation::RemoveFromGroup).await?;

        let mut customers = self.customers.lock().await;
        let customer = customers.get_mut(customer_id.as_str()).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;
        let before = customer.group_ids.len();
        customer.group_ids.retain(|stored| stored != group_id);
        if customer.group_ids.len() == before {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' is not a member of group '{group_id}'"
            )));
        }
        Ok(())
    }

    async fn merge_customer_metadata(
        &self,
        customer_id: &CustomerId,
        patch: Metadata,
    ) -> AppResult<()> {
        self.record("merge_metadata".to_owned()).await;
        self.check(FakeOperation::MergeMetadata).await?;

        let mut customers = self.customers.lock().await;
        let customer = customers.get_mut(customer_id.as_str()).ok_or_else(|| {
            AppError::NotFound(format!("customer '{customer_id}' was not found"))
        })?;
        merge_metadata(&mut customer.metadata, patch);
        Ok(())
    }

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer> {
        self.customers.lock().await.insert(
            customer.id.as_str().to_owned(),
            StoredCustomer {
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
        self.check(FakeOperation::DeleteCustomer).await?;
        self.customers
            .lock()
            .await
            .remove(customer_id.as_str())
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("customer '{customer_id}' was not found")))
    }
}
