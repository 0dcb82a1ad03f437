//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod customer;
mod password;
mod pricing_role;

pub use customer::{
    Customer, CustomerGroup, Metadata, PRICING_ROLE_METADATA_KEY, merge_metadata,
};
pub use password::{
    CUSTOMER_PASSWORD_MAX_LENGTH, CUSTOMER_PASSWORD_MIN_LENGTH, validate_customer_password,
};
pub use pricing_role::{PriceVisibility, PricingRole};
