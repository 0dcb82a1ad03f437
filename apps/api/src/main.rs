//! Pricetier API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use pricetier_application::{
    CustomerAdminService, CustomerRoleService, GroupBootstrapReport, StorefrontPricingService,
};
use pricetier_core::AppError;
use pricetier_infrastructure::{
    Argon2PasswordHasher, PostgresAuthIdentityRepository, PostgresCustomerRepository,
};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let customer_repository = Arc::new(PostgresCustomerRepository::new(pool.clone()));
    let auth_identity_repository = Arc::new(PostgresAuthIdentityRepository::new(pool.clone()));

    let role_service = CustomerRoleService::new(customer_repository.clone(), config.role_groups.clone());
    log_bootstrap_report(&role_service.initialize_groups().await);

    let app_state = AppState {
        storefront_pricing_service: StorefrontPricingService::new(role_service.clone()),
        customer_admin_service: CustomerAdminService::new(
            customer_repository,
            auth_identity_repository,
            Arc::new(Argon2PasswordHasher::new()),
        ),
        role_service,
        admin_api_token: Arc::from(config.admin_api_token.as_str()),
        store_proxy_token: Arc::from(config.store_proxy_token.as_str()),
        postgres_pool: Some(pool),
    };

    let app = api_router::build_router(app_state, &config.store_cors)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "pricetier-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn log_bootstrap_report(report: &GroupBootstrapReport) {
    if report.is_complete() {
        info!("all customer pricing groups are in place");
        return;
    }

    let failed: Vec<&str> = report
        .failed_roles()
        .iter()
        .map(|role| role.as_str())
        .collect();
    warn!(
        failed_roles = ?failed,
        "customer pricing groups incomplete, they will be created on first assignment"
    );
}
