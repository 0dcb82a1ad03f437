pub mod customer_roles;
pub mod customers;
pub mod health;
pub mod storefront;
