use pricetier_core::{AppError, AppResult};
use pricetier_domain::{Metadata, PricingRole};
use serde_json::Value;
use tracing::{error, info};

use crate::NewCustomerGroup;

use super::CustomerRoleService;

/// Result of ensuring one role group exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBootstrapOutcome {
    /// The group was already present.
    AlreadyPresent,
    /// The group was created by this call.
    Created,
    /// The group could not be verified or created.
    Failed(String),
}

/// Per-role outcome of [`CustomerRoleService::initialize_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBootstrapReport {
    /// Outcomes in role declaration order.
    pub outcomes: Vec<(PricingRole, GroupBootstrapOutcome)>,
}

impl GroupBootstrapReport {
    /// Returns the roles whose group could not be ensured.
    #[must_use]
    pub fn failed_roles(&self) -> Vec<PricingRole> {
        self.outcomes
            .iter()
            .filter_map(|(role, outcome)| {
                matches!(outcome, GroupBootstrapOutcome::Failed(_)).then_some(*role)
            })
            .collect()
    }

    /// Returns true when every role group is in place.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_roles().is_empty()
    }
}

impl CustomerRoleService {
    /// Ensures the group for every role exists.
    ///
    /// Each group is handled independently: a failure is logged and recorded
    /// in the report, and the remaining groups are still processed.
    pub async fn initialize_groups(&self) -> GroupBootstrapReport {
        let mut outcomes = Vec::with_capacity(PricingRole::all().len());

        for role in PricingRole::all() {
            let descriptor = self.descriptor(*role);
            let outcome = match self.ensure_role_group(*role).await {
                Ok(outcome) => {
                    info!(
                        role = %role,
                        group_id = %descriptor.group_id,
                        "customer group '{}' initialized",
                        descriptor.name
                    );
                    outcome
                }
                Err(failure) => {
                    error!(
                        role = %role,
                        group_id = %descriptor.group_id,
                        error = %failure,
                        "failed to initialize customer group '{}'",
                        descriptor.name
                    );
                    GroupBootstrapOutcome::Failed(failure.to_string())
                }
            };
            outcomes.push((*role, outcome));
        }

        GroupBootstrapReport { outcomes }
    }

    /// Creates the group backing `role` unless it already exists.
    ///
    /// A concurrent creator winning the race surfaces as `Conflict` from the
    /// store and counts as present.
    pub(super) async fn ensure_role_group(
        &self,
        role: PricingRole,
    ) -> AppResult<GroupBootstrapOutcome> {
        let descriptor = self.descriptor(role);

        if self
            .repository
            .find_group(&descriptor.group_id)
            .await?
            .is_some()
        {
            return Ok(GroupBootstrapOutcome::AlreadyPresent);
        }

        info!(role = %role, group_id = %descriptor.group_id, "creating customer group");

        let mut metadata = Metadata::new();
        metadata.insert("role".to_owned(), Value::String(role.as_str().to_owned()));
        metadata.insert(
            "description".to_owned(),
            Value::String(descriptor.description.to_owned()),
        );

        match self
            .repository
            .create_group(NewCustomerGroup {
                id: descriptor.group_id.clone(),
                name: descriptor.name.to_owned(),
                metadata,
            })
            .await
        {
            Ok(_) => Ok(GroupBootstrapOutcome::Created),
            Err(AppError::Conflict(_)) => Ok(GroupBootstrapOutcome::AlreadyPresent),
            Err(error) => Err(error),
        }
    }
}
