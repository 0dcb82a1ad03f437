use pricetier_application::{CustomerRepository, NewCustomer, NewCustomerGroup};
use pricetier_core::{AppError, CustomerGroupId, CustomerId};
use pricetier_domain::{Metadata, PRICING_ROLE_METADATA_KEY};
use serde_json::json;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresCustomerRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres customer tests: {error}");
    }

    Some(pool)
}

fn unique_customer_id() -> CustomerId {
    CustomerId::new(format!("cust_{}", Uuid::new_v4().simple())).unwrap_or_else(|_| unreachable!())
}

fn unique_group_id() -> CustomerGroupId {
    CustomerGroupId::new(format!("cgrp_{}", Uuid::new_v4().simple()))
        .unwrap_or_else(|_| unreachable!())
}

async fn seed_customer(repository: &PostgresCustomerRepository, metadata: Metadata) -> CustomerId {
    let customer_id = unique_customer_id();
    let created = repository
        .create_customer(NewCustomer {
            id: customer_id.clone(),
            email: format!("{customer_id}@Example.com"),
            metadata,
        })
        .await;
    assert!(created.is_ok());
    customer_id
}

async fn seed_group(repository: &PostgresCustomerRepository) -> CustomerGroupId {
    let group_id = unique_group_id();
    let created = repository
        .create_group(NewCustomerGroup {
            id: group_id.clone(),
            name: "Test Group".to_owned(),
            metadata: Metadata::new(),
        })
        .await;
    assert!(created.is_ok());
    group_id
}

#[tokio::test]
async fn create_group_twice_reports_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresCustomerRepository::new(pool);
    let group_id = seed_group(&repository).await;

    let second = repository
        .create_group(NewCustomerGroup {
            id: group_id.clone(),
            name: "Duplicate".to_owned(),
            metadata: Metadata::new(),
        })
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    let found = repository.find_group(&group_id).await.unwrap_or_default();
    assert_eq!(found.map(|group| group.name().to_owned()), Some("Test Group".to_owned()));
}

#[tokio::test]
async fn membership_add_is_idempotent_and_remove_reports_non_members() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresCustomerRepository::new(pool);
    let customer_id = seed_customer(&repository, Metadata::new()).await;
    let group_id = seed_group(&repository).await;

    assert!(repository.add_customer_to_group(&customer_id, &group_id).await.is_ok());
    assert!(repository.add_customer_to_group(&customer_id, &group_id).await.is_ok());

    let customer = repository
        .find_customer_with_groups(&customer_id)
        .await
        .unwrap_or_default();
    assert_eq!(customer.map(|customer| customer.groups().len()), Some(1));

    assert!(repository.remove_customer_from_group(&customer_id, &group_id).await.is_ok());
    let second_removal = repository
        .remove_customer_from_group(&customer_id, &group_id)
        .await;
    assert!(matches!(second_removal, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn adding_to_missing_group_reports_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresCustomerRepository::new(pool);
    let customer_id = seed_customer(&repository, Metadata::new()).await;

    let result = repository
        .add_customer_to_group(&customer_id, &unique_group_id())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn metadata_merge_keeps_unrelated_keys() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresCustomerRepository::new(pool);
    let mut initial = Metadata::new();
    initial.insert("company".to_owned(), json!("Acme"));
    let customer_id = seed_customer(&repository, initial).await;

    let mut patch = Metadata::new();
    patch.insert(PRICING_ROLE_METADATA_KEY.to_owned(), json!("vip"));
    assert!(repository.merge_customer_metadata(&customer_id, patch).await.is_ok());

    let customer = repository
        .find_customer_with_groups(&customer_id)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(customer.metadata().get("company"), Some(&json!("Acme")));
    assert_eq!(customer.pricing_role_label(), Some("vip"));
}

#[tokio::test]
async fn delete_customer_removes_memberships() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresCustomerRepository::new(pool);
    let customer_id = seed_customer(&repository, Metadata::new()).await;
    let group_id = seed_group(&repository).await;
    assert!(repository.add_customer_to_group(&customer_id, &group_id).await.is_ok());

    assert!(repository.delete_customer(&customer_id).await.is_ok());

    let found = repository.find_customer_with_groups(&customer_id).await;
    assert!(matches!(found, Ok(None)));
    let second = repository.delete_customer(&customer_id).await;
    assert!(matches!(second, Err(AppError::NotFound(_))));
}
