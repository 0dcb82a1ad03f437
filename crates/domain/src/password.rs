//! Password rules for admin-initiated customer password resets.

use pricetier_core::{AppError, AppResult};

/// Minimum accepted password length for a customer credential.
pub const CUSTOMER_PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum accepted password length, bounding the cost of hashing.
pub const CUSTOMER_PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password supplied by an administrator.
pub fn validate_customer_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < CUSTOMER_PASSWORD_MIN_LENGTH {
        return Err(AppError::InvalidArgument(format!(
            "password must be at least {CUSTOMER_PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > CUSTOMER_PASSWORD_MAX_LENGTH {
        return Err(AppError::InvalidArgument(format!(
            "password must not exceed {CUSTOMER_PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}
