use axum::Json;
use axum::extract::{Path, State};

use pricetier_core::CustomerId;

use crate::dto::{AssignCustomerRoleRequest, CustomerRoleResponse, RoleInfoResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_customer_roles_handler(
    State(state): State<AppState>,
) -> Json<Vec<RoleInfoResponse>> {
    Json(
        state
            .role_service
            .list_roles()
            .into_iter()
            .map(RoleInfoResponse::from)
            .collect(),
    )
}

pub async fn customer_role_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<CustomerRoleResponse>> {
    let customer_id = CustomerId::new(customer_id)?;
    let role = state.role_service.resolve_role(&customer_id).await?;

    Ok(Json(CustomerRoleResponse {
        customer_id: customer_id.into(),
        role: role.as_str().to_owned(),
        role_info: state.role_service.descriptor(role).into(),
    }))
}

pub async fn assign_customer_role_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(payload): Json<AssignCustomerRoleRequest>,
) -> ApiResult<Json<CustomerRoleResponse>> {
    let customer_id = CustomerId::new(customer_id)?;
    state
        .role_service
        .assign_role(&customer_id, payload.role.as_str())
        .await?;

    let role = state.role_service.resolve_role(&customer_id).await?;

    Ok(Json(CustomerRoleResponse {
        customer_id: customer_id.into(),
        role: role.as_str().to_owned(),
        role_info: state.role_service.descriptor(role).into(),
    }))
}
