use std::collections::HashSet;
use std::str::FromStr;

use pricetier_core::{AppError, AppResult, CustomerGroupId};
use pricetier_domain::{PriceVisibility, PricingRole};

use super::CustomerRoleService;

/// Default id of the retail customer group.
pub const DEFAULT_RETAIL_GROUP_ID: &str = "cgrp_retail";
/// Default id of the bulk customer group.
pub const DEFAULT_BULK_GROUP_ID: &str = "cgrp_bulk";
/// Default id of the VIP customer group.
pub const DEFAULT_VIP_GROUP_ID: &str = "cgrp_vip";
/// Default id of the supplier customer group.
pub const DEFAULT_SUPPLIER_GROUP_ID: &str = "cgrp_supplier";

struct RoleText {
    name: &'static str,
    description: &'static str,
}

fn role_text(role: PricingRole) -> RoleText {
    match role {
        PricingRole::Retail => RoleText {
            name: "Retail Customers",
            description: "Standard retail customers with public pricing",
        },
        PricingRole::Bulk => RoleText {
            name: "Bulk Customers",
            description: "Wholesale/bulk purchase customers with discounted pricing",
        },
        PricingRole::Vip => RoleText {
            name: "VIP Customers",
            description: "VIP customers with premium pricing and benefits",
        },
        PricingRole::Supplier => RoleText {
            name: "Suppliers",
            description: "Supplier accounts with special access",
        },
    }
}

/// Mapping from each pricing role to the id of the group backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGroupConfig {
    retail: CustomerGroupId,
    bulk: CustomerGroupId,
    vip: CustomerGroupId,
    supplier: CustomerGroupId,
}

impl RoleGroupConfig {
    /// Creates a mapping. Every role must map to a distinct group id.
    pub fn new(
        retail: impl Into<String>,
        bulk: impl Into<String>,
        vip: impl Into<String>,
        supplier: impl Into<String>,
    ) -> AppResult<Self> {
        let config = Self {
            retail: CustomerGroupId::new(retail)?,
            bulk: CustomerGroupId::new(bulk)?,
            vip: CustomerGroupId::new(vip)?,
            supplier: CustomerGroupId::new(supplier)?,
        };

        let distinct: HashSet<&str> = PricingRole::all()
            .iter()
            .map(|role| config.group_id(*role).as_str())
            .collect();
        if distinct.len() != PricingRole::all().len() {
            return Err(AppError::InvalidArgument(
                "each pricing role must map to a distinct customer group id".to_owned(),
            ));
        }

        Ok(config)
    }

    /// Creates the mapping with the stock `cgrp_*` group ids.
    pub fn with_default_ids() -> AppResult<Self> {
        Self::new(
            DEFAULT_RETAIL_GROUP_ID,
            DEFAULT_BULK_GROUP_ID,
            DEFAULT_VIP_GROUP_ID,
            DEFAULT_SUPPLIER_GROUP_ID,
        )
    }

    /// Returns the group id backing `role`.
    #[must_use]
    pub fn group_id(&self, role: PricingRole) -> &CustomerGroupId {
        match role {
            PricingRole::Retail => &self.retail,
            PricingRole::Bulk => &self.bulk,
            PricingRole::Vip => &self.vip,
            PricingRole::Supplier => &self.supplier,
        }
    }
}

/// Display and lookup data for one pricing role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescriptor {
    /// Role this descriptor belongs to.
    pub role: PricingRole,
    /// Id of the backing customer group.
    pub group_id: CustomerGroupId,
    /// Display name of the backing group.
    pub name: &'static str,
    /// Human readable description.
    pub description: &'static str,
    /// Storefront price columns unlocked by the role.
    pub visibility: PriceVisibility,
}

impl CustomerRoleService {
    /// Returns the descriptor for a known role.
    #[must_use]
    pub fn descriptor(&self, role: PricingRole) -> RoleDescriptor {
        let text = role_text(role);
        RoleDescriptor {
            role,
            group_id: self.config.group_id(role).clone(),
            name: text.name,
            description: text.description,
            visibility: role.price_visibility(),
        }
    }

    /// Looks up a role by slug. Unrecognized slugs yield `None`.
    #[must_use]
    pub fn describe_role(&self, role: &str) -> Option<RoleDescriptor> {
        PricingRole::from_str(role)
            .ok()
            .map(|role| self.descriptor(role))
    }

    /// Lists every role in declaration order.
    #[must_use]
    pub fn list_roles(&self) -> Vec<RoleDescriptor> {
        PricingRole::all()
            .iter()
            .map(|role| self.descriptor(*role))
            .collect()
    }

    /// Returns the group id for a role slug.
    ///
    /// Unrecognized slugs map to the retail group id.
    #[must_use]
    pub fn group_id_for_role(&self, role: &str) -> &CustomerGroupId {
        let role = PricingRole::from_str(role).unwrap_or(PricingRole::DEFAULT);
        self.config.group_id(role)
    }
}
