use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use pricetier_core::AppError;
use tower_http::cors::CorsLayer;

/// Browsers may read the storefront role but never supply the customer id.
pub(super) fn build_store_cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|error| {
                AppError::InvalidArgument(format!("invalid STORE_CORS origin '{origin}': {error}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}
