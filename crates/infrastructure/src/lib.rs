//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_auth_identity_repository;
mod in_memory_customer_repository;
mod postgres_auth_identity_repository;
mod postgres_customer_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_auth_identity_repository::InMemoryAuthIdentityRepository;
pub use in_memory_customer_repository::InMemoryCustomerRepository;
pub use postgres_auth_identity_repository::PostgresAuthIdentityRepository;
pub use postgres_customer_repository::PostgresCustomerRepository;
