use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, put};
use pricetier_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, store_cors: &[String]) -> Result<Router, AppError> {
    let admin_routes = Router::new()
        .route(
            "/admin/customer-roles",
            get(handlers::customer_roles::list_customer_roles_handler),
        )
        .route(
            "/admin/customers/{customer_id}/role",
            get(handlers::customer_roles::customer_role_handler)
                .put(handlers::customer_roles::assign_customer_role_handler),
        )
        .route(
            "/admin/customers/{customer_id}",
            delete(handlers::customers::delete_customer_handler),
        )
        .route(
            "/admin/customers/{customer_id}/password",
            put(handlers::customers::reset_customer_password_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin_token,
        ));

    let store_routes = Router::new()
        .route(
            "/store/customer/role",
            get(handlers::storefront::customer_pricing_role_handler),
        )
        .layer(cors::build_store_cors_layer(store_cors)?);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(store_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
