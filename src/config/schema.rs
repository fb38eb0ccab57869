//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::dispatch::{DEFAULT_METHOD, DEFAULT_SEPARATOR};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Expose error details in 500 responses.
    pub debug: bool,

    /// Listener settings.
    pub server: ServerConfig,

    /// Handler resolution settings.
    pub dispatch: DispatchConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Declared routes, registered in file order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// How composite handler strings are interpreted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Separator between controller identifier and method.
    pub separator: char,

    /// Method invoked when a handler names no method.
    pub default_method: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            default_method: DEFAULT_METHOD.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "restful_router=info,tower_http=info".to_string(),
        }
    }
}

/// A route declared in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Verb tokens, e.g. `["GET", "HEAD"]`.
    pub methods: Vec<String>,

    /// Route pattern, e.g. `/users/{id:\d+}`.
    pub pattern: String,

    /// Composite handler, e.g. `users@show`.
    pub handler: String,
}
