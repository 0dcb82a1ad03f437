use std::str::FromStr;

use pricetier_core::{AppError, AppResult, CustomerId};
use pricetier_domain::{Customer, PricingRole};
use tracing::{debug, warn};

use super::CustomerRoleService;

impl CustomerRoleService {
    /// Resolves the pricing role of a customer.
    ///
    /// Elevated group membership is checked in priority order (VIP, bulk,
    /// supplier). Without a match the `pricing_role` metadata label is used,
    /// and without that the default role.
    pub async fn resolve_role(&self, customer_id: &CustomerId) -> AppResult<PricingRole> {
        let customer = self
            .repository
            .find_customer_with_groups(customer_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("customer '{customer_id}' was not found"))
            })?;

        let group_ids: Vec<&str> = customer
            .groups()
            .iter()
            .map(|group| group.id().as_str())
            .collect();
        debug!(customer_id = %customer_id, groups = ?group_ids, "resolving pricing role");

        if customer.groups().is_empty() {
            return Ok(self.metadata_role(&customer).unwrap_or(PricingRole::DEFAULT));
        }

        if let Some(role) = self.membership_role(&customer) {
            debug!(customer_id = %customer_id, role = %role, "pricing role from group membership");
            return Ok(role);
        }

        Ok(self.metadata_role(&customer).unwrap_or(PricingRole::DEFAULT))
    }

    fn membership_role(&self, customer: &Customer) -> Option<PricingRole> {
        PricingRole::membership_priority()
            .iter()
            .copied()
            .find(|role| customer.belongs_to(self.config.group_id(*role)))
    }

    fn metadata_role(&self, customer: &Customer) -> Option<PricingRole> {
        let label = customer.pricing_role_label()?;

        match PricingRole::from_str(label) {
            Ok(role) => {
                debug!(customer_id = %customer.id(), role = %role, "pricing role from metadata");
                Some(role)
            }
            Err(_) => {
                warn!(
                    customer_id = %customer.id(),
                    pricing_role = label,
                    "ignoring unknown pricing_role metadata value"
                );
                None
            }
        }
    }
}
