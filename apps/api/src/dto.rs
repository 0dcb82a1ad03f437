use pricetier_application::{PasswordResetOutcome, PricingRoleView, RoleDescriptor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Status of one dependency checked by the health endpoint.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// API representation of a pricing role and the prices it unlocks.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-info-response.ts"
)]
pub struct RoleInfoResponse {
    pub slug: String,
    pub group_id: String,
    pub name: String,
    pub description: String,
    pub can_see_bulk_prices: bool,
    pub can_see_vip_prices: bool,
    pub can_see_supplier_prices: bool,
}

impl From<RoleDescriptor> for RoleInfoResponse {
    fn from(descriptor: RoleDescriptor) -> Self {
        Self {
            slug: descriptor.role.as_str().to_owned(),
            group_id: descriptor.group_id.as_str().to_owned(),
            name: descriptor.name.to_owned(),
            description: descriptor.description.to_owned(),
            can_see_bulk_prices: descriptor.visibility.can_see_bulk_prices,
            can_see_vip_prices: descriptor.visibility.can_see_vip_prices,
            can_see_supplier_prices: descriptor.visibility.can_see_supplier_prices,
        }
    }
}

/// Pricing role reported to the storefront.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/storefront-pricing-role-response.ts"
)]
pub struct StorefrontPricingRoleResponse {
    pub authenticated: bool,
    pub customer_id: Option<String>,
    pub role: String,
    pub role_info: RoleInfoResponse,
}

impl From<PricingRoleView> for StorefrontPricingRoleResponse {
    fn from(view: PricingRoleView) -> Self {
        Self {
            authenticated: view.authenticated,
            customer_id: view.customer_id.map(String::from),
            role: view.role.as_str().to_owned(),
            role_info: view.role_info.into(),
        }
    }
}

/// Resolved role of one customer.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/customer-role-response.ts"
)]
pub struct CustomerRoleResponse {
    pub customer_id: String,
    pub role: String,
    pub role_info: RoleInfoResponse,
}

/// Incoming payload for changing a customer's pricing role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-customer-role-request.ts"
)]
pub struct AssignCustomerRoleRequest {
    pub role: String,
}

/// Result of deleting a customer.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-customer-response.ts"
)]
pub struct DeleteCustomerResponse {
    pub success: bool,
    pub message: String,
    pub deleted_id: String,
}

/// Incoming payload for an admin password reset.
#[derive(Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reset-customer-password-request.ts"
)]
pub struct ResetCustomerPasswordRequest {
    pub password: String,
}

/// Result of an admin password reset.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reset-customer-password-response.ts"
)]
pub struct ResetCustomerPasswordResponse {
    pub success: bool,
    pub message: String,
    pub identity_created: bool,
}

impl From<PasswordResetOutcome> for ResetCustomerPasswordResponse {
    fn from(outcome: PasswordResetOutcome) -> Self {
        let identity_created = outcome == PasswordResetOutcome::Created;
        Self {
            success: true,
            message: if identity_created {
                "password identity created".to_owned()
            } else {
                "password updated".to_owned()
            },
            identity_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AssignCustomerRoleRequest, CustomerRoleResponse, DeleteCustomerResponse,
        HealthDependencyStatus, HealthResponse, ResetCustomerPasswordRequest,
        ResetCustomerPasswordResponse, RoleInfoResponse, StorefrontPricingRoleResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        RoleInfoResponse::export(&config)?;
        StorefrontPricingRoleResponse::export(&config)?;
        CustomerRoleResponse::export(&config)?;
        AssignCustomerRoleRequest::export(&config)?;
        DeleteCustomerResponse::export(&config)?;
        ResetCustomerPasswordRequest::export(&config)?;
        ResetCustomerPasswordResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
