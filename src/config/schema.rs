//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure handed to
//! [`crate::bootstrap`]. All types derive Serde traits so an options file can
//! override any subset of the environment-driven defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::env::{self, Lookup};

/// Root configuration for a form application.
///
/// `Default` reads the process environment, see [`AppConfig::from_lookup`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Route definitions. `None` is a configuration error at bootstrap.
    pub routes: Option<Vec<RouteConfig>>,

    /// Directory static assets are served from, relative to `caller`.
    pub asset_path: PathBuf,

    /// Directory holding translation files, relative to `caller`. Carried
    /// for applications built on top; views are served untranslated and
    /// nothing in this crate reads the directory.
    pub translations: PathBuf,

    /// Global views directory.
    pub views: PathSetting,

    /// Global field definitions.
    pub fields: PathSetting,

    /// Base directory relative paths resolve against.
    pub caller: PathBuf,

    /// Start listening once bootstrapped (used by the binary).
    pub start: bool,

    /// Serve the `/cookies` page from the `cookies` view.
    pub get_cookies: bool,

    /// Serve the `/terms-and-conditions` page from the `terms` view.
    pub get_terms: bool,

    /// Template file extension.
    pub view_engine: String,

    /// `http` or `https`.
    pub protocol: String,

    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Deployment environment (`development`, `test`, `production`).
    pub env: String,

    pub redis: RedisConfig,

    pub session: SessionConfig,

    pub timeouts: TimeoutConfig,

    pub security: SecurityConfig,

    /// Prometheus exporter bind address. Disabled when unset.
    pub metrics_address: Option<String>,
}

impl AppConfig {
    /// Build defaults from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(&env::process_env)
    }

    /// Build defaults from an arbitrary variable lookup.
    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        let node_env = env::string_or(lookup, "NODE_ENV", "development");
        let caller = if node_env == "test" {
            PathBuf::from("test/")
        } else {
            PathBuf::from(".")
        };

        Self {
            routes: None,
            asset_path: PathBuf::from("public"),
            translations: PathBuf::from("translations"),
            views: PathSetting::from("views"),
            fields: PathSetting::from("fields"),
            caller,
            start: true,
            get_cookies: true,
            get_terms: true,
            view_engine: "html".to_string(),
            protocol: env::string_or(lookup, "PROTOCOL", "http"),
            host: env::string_or(lookup, "HOST", "0.0.0.0"),
            port: env::parse_or(lookup, "PORT", 8080),
            env: node_env,
            redis: RedisConfig::from_lookup(lookup),
            session: SessionConfig::from_lookup(lookup),
            timeouts: TimeoutConfig::default(),
            security: SecurityConfig::default(),
            metrics_address: lookup("METRICS_ADDRESS").filter(|v| !v.is_empty()),
        }
    }

    /// Address the application binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn is_secure(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https")
    }

    /// Resolve a configured path against `caller`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        crate::config::validation::resolve_path(&self.caller, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A path that may be switched off.
///
/// Accepts `false` or an empty string for [`PathSetting::Disabled`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawPathSetting", into = "RawPathSetting")]
pub enum PathSetting {
    Disabled,
    Path(PathBuf),
}

impl PathSetting {
    /// The configured path, if enabled.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            PathSetting::Disabled => None,
            PathSetting::Path(p) => Some(p.as_path()),
        }
    }
}

impl From<&str> for PathSetting {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            PathSetting::Disabled
        } else {
            PathSetting::Path(PathBuf::from(value))
        }
    }
}

impl From<PathBuf> for PathSetting {
    fn from(value: PathBuf) -> Self {
        if value.as_os_str().is_empty() {
            PathSetting::Disabled
        } else {
            PathSetting::Path(value)
        }
    }
}

impl From<&Path> for PathSetting {
    fn from(value: &Path) -> Self {
        PathSetting::from(value.to_path_buf())
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum RawPathSetting {
    Flag(bool),
    Path(PathBuf),
}

impl TryFrom<RawPathSetting> for PathSetting {
    type Error = String;

    fn try_from(raw: RawPathSetting) -> Result<Self, Self::Error> {
        match raw {
            RawPathSetting::Flag(false) => Ok(PathSetting::Disabled),
            RawPathSetting::Flag(true) => Err("expected a path or `false`, found `true`".to_string()),
            RawPathSetting::Path(p) => Ok(PathSetting::from(p)),
        }
    }
}

impl From<PathSetting> for RawPathSetting {
    fn from(setting: PathSetting) -> Self {
        match setting {
            PathSetting::Disabled => RawPathSetting::Flag(false),
            PathSetting::Path(p) => RawPathSetting::Path(p),
        }
    }
}

/// A set of steps mounted together, optionally under a base URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Step path (e.g. "/one") to step settings. Required.
    #[serde(default)]
    pub steps: Option<BTreeMap<String, StepConfig>>,

    /// Views directory for this route, searched before the global one.
    #[serde(default)]
    pub views: Option<PathBuf>,

    /// Field definitions for this route, merged over the global ones.
    #[serde(default)]
    pub fields: Option<PathBuf>,

    /// Prefix for every step path (e.g. "/app_1").
    #[serde(default, alias = "baseUrl")]
    pub base_url: Option<String>,

    /// Trailing parameter pattern such as "/:action?".
    #[serde(default)]
    pub params: Option<String>,
}

impl RouteConfig {
    /// Convenience constructor for a route with the given step paths.
    pub fn with_steps<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: Some(
                steps
                    .into_iter()
                    .map(|s| (s.into(), StepConfig::default()))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

/// Settings for a single step.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StepConfig {
    /// View name, defaults to the step path without its leading slash.
    pub template: Option<String>,

    /// Field names collected by this step.
    pub fields: Vec<String>,

    /// Step to redirect to after a valid submission.
    pub next: Option<String>,
}

/// Redis connection settings.
///
/// Sessions are held in process; these are carried for deployments that
/// front the store externally.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl RedisConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        Self {
            host: env::string_or(lookup, "REDIS_HOST", "127.0.0.1"),
            port: env::parse_or(lookup, "REDIS_PORT", 6379),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::from_lookup(&env::process_env)
    }
}

/// Session cookie and store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle lifetime in seconds.
    pub ttl: u64,

    /// Key used to sign session cookies.
    pub secret: String,

    /// Session cookie name.
    pub name: String,
}

impl SessionConfig {
    pub fn from_lookup(lookup: Lookup<'_>) -> Self {
        Self {
            ttl: env::parse_or(lookup, "SESSION_TTL", 1800),
            secret: env::string_or(lookup, "SESSION_SECRET", "changethis"),
            name: env::string_or(lookup, "SESSION_NAME", "hod.sid"),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_lookup(&env::process_env)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
