use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::dto::StorefrontPricingRoleResponse;
use crate::middleware::trusted_customer_id;
use crate::state::AppState;

/// Reports the pricing role of the current storefront visitor.
///
/// Always succeeds; resolution problems are logged and reported as retail.
pub async fn customer_pricing_role_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<StorefrontPricingRoleResponse> {
    let view = state
        .storefront_pricing_service
        .pricing_role_for(trusted_customer_id(&headers, &state.store_proxy_token))
        .await;

    Json(view.into())
}
