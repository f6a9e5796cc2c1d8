//! Environment-driven base URL lookup.

use std::env;

/// Environment variable naming the account API host, e.g. `http://accountapi:8080`.
pub static ENV_VAR_HOST_ADDR: &str = "API_HOST_ADDR";

pub static DEFAULT_HOST_ADDR: &str = "http://localhost:8080";

/// Base URL from `API_HOST_ADDR`, or [`DEFAULT_HOST_ADDR`] when unset or blank.
pub fn host_address() -> String {
    host_address_or_default(env::var(ENV_VAR_HOST_ADDR).ok())
}

fn host_address_or_default(value: Option<String>) -> String {
    match value {
        Some(addr) if !addr.trim().is_empty() => addr.trim().to_string(),
        _ => DEFAULT_HOST_ADDR.to_string(),
    }
}
