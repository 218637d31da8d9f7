//! Environment variable lookups.
//!
//! Defaults are computed through a [`Lookup`] so tests can supply their own
//! variables instead of mutating the process environment.

use std::str::FromStr;

/// Variable name to value.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Value of `key`, or `default` when unset or empty.
pub fn string_or(lookup: Lookup<'_>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parsed value of `key`, or `default` when unset or unparseable.
pub fn parse_or<T: FromStr>(lookup: Lookup<'_>, key: &str, default: T) -> T {
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = key, value = %raw, "Ignoring unparseable environment variable");
                default
            }
        },
        None => default,
    }
}
