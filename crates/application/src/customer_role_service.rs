//! Customer pricing-role resolution and assignment.
//!
//! A customer's pricing role is derived from membership in one of four
//! role groups. Membership wins over the `pricing_role` metadata label, which
//! is only consulted when no elevated group matches. Every call re-reads the
//! store; nothing is cached.

use std::sync::Arc;

use crate::CustomerRepository;

mod assign;
mod bootstrap;
mod catalog;
mod resolve;

pub use bootstrap::{GroupBootstrapOutcome, GroupBootstrapReport};
pub use catalog::{
    DEFAULT_BULK_GROUP_ID, DEFAULT_RETAIL_GROUP_ID, DEFAULT_SUPPLIER_GROUP_ID, DEFAULT_VIP_GROUP_ID,
    RoleDescriptor, RoleGroupConfig,
};

/// Resolves and assigns customer pricing roles against the customer store.
#[derive(Clone)]
pub struct CustomerRoleService {
    repository: Arc<dyn CustomerRepository>,
    config: Arc<RoleGroupConfig>,
}

impl CustomerRoleService {
    /// Creates a service over the given store and role-group mapping.
    #[must_use]
    pub fn new(repository: Arc<dyn CustomerRepository>, config: RoleGroupConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }

    /// Returns the role-group mapping in use.
    #[must_use]
    pub fn config(&self) -> &RoleGroupConfig {
        &self.config
    }
}
