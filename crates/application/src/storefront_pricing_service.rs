use pricetier_core::CustomerId;
use pricetier_domain::PricingRole;
use tracing::warn;

use crate::{CustomerRoleService, RoleDescriptor};

/// Pricing role as seen by the storefront for one visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingRoleView {
    /// True when the request carried a customer identity.
    pub authenticated: bool,
    /// Customer the role was resolved for.
    pub customer_id: Option<CustomerId>,
    /// Effective pricing role.
    pub role: PricingRole,
    /// Descriptor of the effective role.
    pub role_info: RoleDescriptor,
}

/// Read path used when rendering prices.
///
/// Never fails: anonymous visitors and resolution errors both yield the
/// default role.
#[derive(Clone)]
pub struct StorefrontPricingService {
    roles: CustomerRoleService,
}

impl StorefrontPricingService {
    /// Creates the read path over a role service.
    #[must_use]
    pub fn new(roles: CustomerRoleService) -> Self {
        Self { roles }
    }

    /// Returns the effective role for an optional customer.
    pub async fn effective_role(&self, customer_id: Option<&CustomerId>) -> PricingRole {
        let Some(customer_id) = customer_id else {
            return PricingRole::DEFAULT;
        };

        match self.roles.resolve_role(customer_id).await {
            Ok(role) => role,
            Err(error) => {
                warn!(
                    customer_id = %customer_id,
                    error = %error,
                    "pricing role resolution failed, using default role"
                );
                PricingRole::DEFAULT
            }
        }
    }

    /// Builds the storefront view for an optional customer.
    pub async fn pricing_role_for(&self, customer_id: Option<CustomerId>) -> PricingRoleView {
        let role = self.effective_role(customer_id.as_ref()).await;

        PricingRoleView {
            authenticated: customer_id.is_some(),
            customer_id,
            role,
            role_info: self.roles.descriptor(role),
        }
    }
}
