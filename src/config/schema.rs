//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Special-verb policy and debug introspection.
    pub dispatch: DispatchConfig,

    /// Static resources served as models.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
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

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Policy for non-standard verbs and introspection routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Methods always refused with `403 Forbidden`.
    pub forbidden_methods: Vec<String>,

    /// Methods always answered with `418 I'm a teapot`.
    pub teapot_methods: Vec<String>,

    /// Register `GET /debug/routes` and `GET /debug/representers`.
    pub debug_routes: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            forbidden_methods: vec!["TRACE".to_string()],
            teapot_methods: vec!["BREW".to_string()],
            debug_routes: false,
        }
    }
}

/// A static resource: any request matching `method` and `pattern` is
/// answered with `model`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method (case-insensitive).
    #[serde(default = "default_method")]
    pub method: String,

    /// Route pattern, matched against the whole request path.
    pub pattern: String,

    /// The model served for this route.
    pub model: serde_json::Value,

    /// Optional class tag turning the model into an object.
    #[serde(default)]
    pub class: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.limits.max_body_size, 2 * 1024 * 1024);
        assert_eq!(config.dispatch.forbidden_methods, vec!["TRACE"]);
        assert_eq!(config.dispatch.teapot_methods, vec!["BREW"]);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_route_table_parsing() {
        let config: ServerConfig = toml::from_str(
            r#"
            [[routes]]
            pattern = "/status"
            model = { healthy = true }

            [[routes]]
            method = "post"
            pattern = "/users/(?P<id>\\d+)"
            model = [1, 2]
            class = "User"
            "#,
        )
        .unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].method, "GET");
        assert_eq!(config.routes[0].model, serde_json::json!({"healthy": true}));
        assert_eq!(config.routes[1].class.as_deref(), Some("User"));
    }
}
