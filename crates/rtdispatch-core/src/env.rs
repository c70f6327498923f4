//! Environment variable utilities
//!
//! Typed lookups with defaults, used by the logging setup and by
//! `PoolConfig::from_env()` in the runtime crate.
//!
//! # Usage
//!
//! ```ignore
//! use rtdispatch_core::env::{env_get, env_get_bool};
//!
//! let workers: usize = env_get("RTD_WORKERS", 4);
//! let priority: i32 = env_get("RTD_PRIORITY", 0);
//!
//! // Boolean helper (accepts "1", "true", "yes", "on")
//! let realtime: bool = env_get_bool("RTD_REALTIME", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// A variable that is set but does not parse also yields the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as boolean
///
/// Accepts: "1", "true", "yes", "on" (case-insensitive) as true.
/// Any other value is false; an unset variable returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as optional value
///
/// Returns `Some(T)` if the variable is set and parses successfully,
/// `None` otherwise.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as string, or return default
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value)
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}
