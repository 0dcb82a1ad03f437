use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use pricetier_core::{AppError, CustomerId};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the storefront customer id resolved by the storefront proxy.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// Header carrying the shared secret of the storefront proxy.
pub const STORE_PROXY_TOKEN_HEADER: &str = "x-store-proxy-token";

pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let authorized = extract_bearer_token(request.headers().get(AUTHORIZATION))
        .map(|token| token_matches(token, &state.admin_api_token));

    match authorized {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            warn!(path = %request.uri().path(), "rejected admin request with invalid token");
            Err(AppError::Unauthorized("invalid admin token".to_owned()).into())
        }
        None => Err(AppError::Unauthorized("admin token required".to_owned()).into()),
    }
}

/// Reads the storefront customer id vouched for by the storefront proxy.
///
/// The id is only trusted when the proxy token matches. Missing or blank
/// values, or an unverified id, mean anonymous.
pub fn trusted_customer_id(headers: &HeaderMap, proxy_token: &str) -> Option<CustomerId> {
    let customer_id = headers
        .get(CUSTOMER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| CustomerId::new(value).ok())?;

    let verified = headers
        .get(STORE_PROXY_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|token| token_matches(token, proxy_token));

    if !verified {
        warn!(
            customer_id = %customer_id,
            "ignored storefront customer id without a valid proxy token"
        );
        return None;
    }

    Some(customer_id)
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn token_matches(presented: &str, expected: &str) -> bool {
    bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}
