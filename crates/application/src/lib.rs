//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_identity_ports;
mod customer_admin_service;
mod customer_ports;
mod customer_role_service;
mod storefront_pricing_service;

#[cfg(test)]
mod test_support;

pub use auth_identity_ports::{
    AuthIdentity, AuthIdentityRepository, EMAIL_PASSWORD_PROVIDER, NewAuthIdentity,
    PasswordHasher,
};
pub use customer_admin_service::{CustomerAdminService, DeletedCustomer, PasswordResetOutcome};
pub use customer_ports::{CustomerRepository, NewCustomer, NewCustomerGroup};
pub use customer_role_service::{
    CustomerRoleService, DEFAULT_BULK_GROUP_ID, DEFAULT_RETAIL_GROUP_ID,
    DEFAULT_SUPPLIER_GROUP_ID, DEFAULT_VIP_GROUP_ID, GroupBootstrapOutcome, GroupBootstrapReport,
    RoleDescriptor, RoleGroupConfig,
};
pub use storefront_pricing_service::{PricingRoleView, StorefrontPricingService};
