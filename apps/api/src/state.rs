use std::sync::Arc;

use pricetier_application::{CustomerAdminService, CustomerRoleService, StorefrontPricingService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: CustomerRoleService,
    pub storefront_pricing_service: StorefrontPricingService,
    pub customer_admin_service: CustomerAdminService,
    pub admin_api_token: Arc<str>,
    pub store_proxy_token: Arc<str>,
    pub postgres_pool: Option<PgPool>,
}
