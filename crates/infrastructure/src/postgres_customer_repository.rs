//! PostgreSQL-backed customer and customer group repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use pricetier_application::{CustomerRepository, NewCustomer, NewCustomerGroup};
use pricetier_core::{AppError, AppResult, CustomerGroupId, CustomerId};
use pricetier_domain::{Customer, CustomerGroup, Metadata};

/// PostgreSQL implementation of the customer repository port.
#[derive(Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    email: String,
    metadata: Value,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerGroupRow {
    id: String,
    name: String,
    metadata: Value,
}

impl TryFrom<CustomerGroupRow> for CustomerGroup {
    type Error = AppError;

    fn try_from(row: CustomerGroupRow) -> Result<Self, Self::Error> {
        Ok(CustomerGroup::new(
            CustomerGroupId::new(row.id)?,
            row.name,
            metadata_from_value(row.metadata),
        ))
    }
}

fn metadata_from_value(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

fn sqlstate(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(database_error) => {
            database_error.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_customer_with_groups(
        &self,
        customer_id: &CustomerId,
    ) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, email, metadata
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(customer_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load customer '{customer_id}': {error}"
            ))
        })?;

        let Some(customer) = customer else {
            return Ok(None);
        };

        let groups = sqlx::query_as::<_, CustomerGroupRow>(
            r#"
            SELECT g.id, g.name, g.metadata
            FROM customer_group_customers m
            INNER JOIN customer_groups g ON g.id = m.customer_group_id
            WHERE m.customer_id = $1
            ORDER BY m.created_at, g.id
            "#,
        )
        .bind(customer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load groups for customer '{customer_id}': {error}"
            ))
        })?
        .into_iter()
        .map(CustomerGroup::try_from)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(Customer::new(
            CustomerId::new(customer.id)?,
            customer.email,
            metadata_from_value(customer.metadata),
            groups,
        )))
    }

    async fn find_group(&self, group_id: &CustomerGroupId) -> AppResult<Option<CustomerGroup>> {
        sqlx::query_as::<_, CustomerGroupRow>(
            r#"
            SELECT id, name, metadata
            FROM customer_groups
            WHERE id = $1
            "#,
        )
        .bind(group_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load customer group '{group_id}': {error}"
            ))
        })?
        .map(CustomerGroup::try_from)
        .transpose()
    }

    async fn create_group(&self, group: NewCustomerGroup) -> AppResult<CustomerGroup> {
        sqlx::query_as::<_, CustomerGroupRow>(
            r#"
            INSERT INTO customer_groups (id, name, metadata)
            VALUES ($1, $2, $3)
            RETURNING id, name, metadata
            "#,
        )
        .bind(group.id.as_str())
        .bind(group.name.as_str())
        .bind(Json(&group.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if sqlstate(&error).as_deref() == Some("23505") {
                return AppError::Conflict(format!(
                    "customer group '{}' already exists",
                    group.id
                ));
            }
            AppError::Internal(format!(
                "failed to create customer group '{}': {error}",
                group.id
            ))
        })?
        .try_into()
    }

    async fn add_customer_to_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customer_group_customers (customer_id, customer_group_id)
            VALUES ($1, $2)
            ON CONFLICT (customer_id, customer_group_id) DO NOTHING
            "#,
        )
        .bind(customer_id.as_str())
        .bind(group_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if sqlstate(&error).as_deref() == Some("23503") {
                return AppError::NotFound(format!(
                    "customer '{customer_id}' or customer group '{group_id}' was not found"
                ));
            }
            AppError::Internal(format!(
                "failed to add customer '{customer_id}' to group '{group_id}': {error}"
            ))
        })?;

        Ok(())
    }

    async fn remove_customer_from_group(
        &self,
        customer_id: &CustomerId,
        group_id: &CustomerGroupId,
    ) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM customer_group_customers
            WHERE customer_id = $1 AND customer_group_id = $2
            "#,
        )
        .bind(customer_id.as_str())
        .bind(group_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to remove customer '{customer_id}' from group '{group_id}': {error}"
            ))
        })?;

        if deleted.rows_affected() == 0 {
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
        let updated = sqlx::query(
            r#"
            UPDATE customers
            SET metadata = COALESCE(metadata, '{}'::jsonb) || $2::jsonb,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(customer_id.as_str())
        .bind(Json(&patch))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update metadata of customer '{customer_id}': {error}"
            ))
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (id, email, metadata)
            VALUES ($1, $2, $3)
            RETURNING id, email, metadata
            "#,
        )
        .bind(customer.id.as_str())
        .bind(customer.email.as_str())
        .bind(Json(&customer.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if sqlstate(&error).as_deref() == Some("23505") {
                return AppError::Conflict(format!(
                    "customer '{}' already exists",
                    customer.id
                ));
            }
            AppError::Internal(format!(
                "failed to create customer '{}': {error}",
                customer.id
            ))
        })?;

        Ok(Customer::new(
            CustomerId::new(row.id)?,
            row.email,
            metadata_from_value(row.metadata),
            Vec::new(),
        ))
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM customers
            WHERE id = $1
            "#,
        )
        .bind(customer_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete customer '{customer_id}': {error}"
            ))
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' was not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
