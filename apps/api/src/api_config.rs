use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use pricetier_application::{
    DEFAULT_BULK_GROUP_ID, DEFAULT_RETAIL_GROUP_ID, DEFAULT_SUPPLIER_GROUP_ID,
    DEFAULT_VIP_GROUP_ID, RoleGroupConfig,
};
use pricetier_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const SECRET_TOKEN_MIN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub admin_api_token: String,
    pub store_proxy_token: String,
    pub store_cors: Vec<String>,
    pub role_groups: RoleGroupConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let admin_api_token = required_secret_env("ADMIN_API_TOKEN")?;
        let store_proxy_token = required_secret_env("STORE_PROXY_TOKEN")?;
        if store_proxy_token == admin_api_token {
            return Err(AppError::InvalidArgument(
                "STORE_PROXY_TOKEN must differ from ADMIN_API_TOKEN".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(9000);

        let store_cors = parse_origins(
            env::var("STORE_CORS")
                .unwrap_or_else(|_| "http://localhost:3000".to_owned())
                .as_str(),
        )?;

        let role_groups = RoleGroupConfig::new(
            env_or("CUSTOMER_GROUP_RETAIL_ID", DEFAULT_RETAIL_GROUP_ID),
            env_or("CUSTOMER_GROUP_BULK_ID", DEFAULT_BULK_GROUP_ID),
            env_or("CUSTOMER_GROUP_VIP_ID", DEFAULT_VIP_GROUP_ID),
            env_or("CUSTOMER_GROUP_SUPPLIER_ID", DEFAULT_SUPPLIER_GROUP_ID),
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            admin_api_token,
            store_proxy_token,
            store_cors,
            role_groups,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::InvalidArgument(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses a comma separated list of storefront origins.
fn parse_origins(raw: &str) -> Result<Vec<String>, AppError> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            let url = Url::parse(value).map_err(|error| {
                AppError::InvalidArgument(format!("invalid STORE_CORS origin '{value}': {error}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AppError::InvalidArgument(format!(
                    "STORE_CORS origin '{value}' must use http or https"
                )));
            }
            Ok(url.origin().ascii_serialization())
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(AppError::InvalidArgument(
            "STORE_CORS must list at least one origin".to_owned(),
        ));
    }

    Ok(origins)
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn required_secret_env(name: &str) -> Result<String, AppError> {
    let value = required_non_empty_env(name)?;
    check_secret_length(name, &value)?;
    Ok(value)
}

fn check_secret_length(name: &str, value: &str) -> Result<(), AppError> {
    if value.len() < SECRET_TOKEN_MIN_LENGTH {
        return Err(AppError::InvalidArgument(format!(
            "{name} must be at least {SECRET_TOKEN_MIN_LENGTH} characters"
        )));
    }

    Ok(())
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value =
        env::var(name).map_err(|_| AppError::InvalidArgument(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{name} must not be empty")));
    }

    Ok(value)
}
