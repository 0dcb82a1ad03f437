use std::str::FromStr;

use pricetier_core::{AppError, AppResult, CustomerId};
use pricetier_domain::{Metadata, PRICING_ROLE_METADATA_KEY, PricingRole};
use serde_json::Value;
use tracing::{error, info};

use super::CustomerRoleService;

#[derive(Debug, Clone, Copy)]
enum AssignStep {
    EnsureGroup,
    RemoveFromOtherGroups,
    AddToGroup,
    WriteMetadata,
}

impl AssignStep {
    fn as_str(self) -> &'static str {
        match self {
            Self::EnsureGroup => "ensure_group",
            Self::RemoveFromOtherGroups => "remove_from_other_groups",
            Self::AddToGroup => "add_to_group",
            Self::WriteMetadata => "write_metadata",
        }
    }
}

impl CustomerRoleService {
    /// Assigns a role given as a transport slug.
    ///
    /// Slugs outside the closed role set fail with `InvalidArgument` before
    /// the store is touched.
    pub async fn assign_role(&self, customer_id: &CustomerId, role: &str) -> AppResult<()> {
        let role = PricingRole::from_str(role)?;
        self.assign_pricing_role(customer_id, role).await
    }

    /// Makes `role` the customer's only pricing role.
    ///
    /// Steps run in a fixed order: ensure the target group, leave every other
    /// role group, join the target group, then merge `pricing_role` into the
    /// customer metadata. The sequence is not transactional; a failure part
    /// way leaves membership ahead of metadata, which resolution tolerates
    /// because membership wins. Repeating the call is safe.
    pub async fn assign_pricing_role(
        &self,
        customer_id: &CustomerId,
        role: PricingRole,
    ) -> AppResult<()> {
        if self
            .repository
            .find_customer_with_groups(customer_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' was not found"
            )));
        }

        self.ensure_role_group(role)
            .await
            .map_err(|error| step_failure(AssignStep::EnsureGroup, customer_id, role, error))?;

        for other in PricingRole::all().iter().filter(|other| **other != role) {
            let group_id = self.config.group_id(*other);
            match self
                .repository
                .remove_customer_from_group(customer_id, group_id)
                .await
            {
                Ok(()) => {
                    info!(
                        customer_id = %customer_id,
                        group_id = %group_id,
                        "removed customer from pricing group"
                    );
                }
                Err(AppError::NotFound(_)) => {}
                Err(error) => {
                    return Err(step_failure(
                        AssignStep::RemoveFromOtherGroups,
                        customer_id,
                        role,
                        error,
                    ));
                }
            }
        }

        let target_group_id = self.config.group_id(role);
        self.repository
            .add_customer_to_group(customer_id, target_group_id)
            .await
            .map_err(|error| step_failure(AssignStep::AddToGroup, customer_id, role, error))?;

        let mut patch = Metadata::new();
        patch.insert(
            PRICING_ROLE_METADATA_KEY.to_owned(),
            Value::String(role.as_str().to_owned()),
        );
        self.repository
            .merge_customer_metadata(customer_id, patch)
            .await
            .map_err(|error| step_failure(AssignStep::WriteMetadata, customer_id, role, error))?;

        info!(
            customer_id = %customer_id,
            role = %role,
            group_id = %target_group_id,
            "assigned pricing role to customer"
        );

        Ok(())
    }
}

fn step_failure(
    step: AssignStep,
    customer_id: &CustomerId,
    role: PricingRole,
    failure: AppError,
) -> AppError {
    error!(
        customer_id = %customer_id,
        role = %role,
        step = step.as_str(),
        error = %failure,
        "failed to assign pricing role"
    );

    if failure.is_not_found() {
        return failure;
    }

    AppError::UnexpectedState(format!(
        "assigning role '{role}' to customer '{customer_id}' failed at step '{}': {failure}",
        step.as_str()
    ))
}
