//! Environment variable parsing utilities.
//!
//! Resolver settings (`SUI_MVR_*`) and transport timeouts are read through
//! these helpers so an unset or unparsable variable always falls back to the
//! compiled-in default.
//!
//! ```
//! use sui_mvr_types::env_utils::{env_var, env_var_or};
//!
//! let page_size: usize = env_var_or("SUI_MVR_PAGE_SIZE", 10);
//! let custom: Option<u64> = env_var("SUI_MVR_SOMETHING_UNSET");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a string variable, treating blank values as unset.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
