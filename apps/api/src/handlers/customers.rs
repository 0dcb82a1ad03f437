use axum::Json;
use axum::extract::{Path, State};

use pricetier_core::CustomerId;

use crate::dto::{
    DeleteCustomerResponse, ResetCustomerPasswordRequest, ResetCustomerPasswordResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<DeleteCustomerResponse>> {
    let customer_id = CustomerId::new(customer_id)?;
    let deleted = state
        .customer_admin_service
        .delete_customer(&customer_id)
        .await?;

    Ok(Json(DeleteCustomerResponse {
        success: true,
        message: format!("Customer {} deleted successfully", deleted.email),
        deleted_id: deleted.customer_id.into(),
    }))
}

pub async fn reset_customer_password_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<ResetCustomerPasswordRequest>,
) -> ApiResult<Json<ResetCustomerPasswordResponse>> {
    let customer_id = CustomerId::new(customer_id)?;
    let outcome = state
        .customer_admin_service
        .reset_password(&customer_id, payload.password.as_str())
        .await?;

    Ok(Json(outcome.into()))
}
