//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that method names are HTTP tokens and route patterns compile
//! - Detect conflicting special-verb policies
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::RoutePattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check `config`, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    let dispatch = &config.dispatch;
    for (list, field) in [
        (&dispatch.forbidden_methods, "dispatch.forbidden_methods"),
        (&dispatch.teapot_methods, "dispatch.teapot_methods"),
    ] {
        for method in list {
            if !is_token(method) {
                errors.push(ValidationError::new(field, format!("'{method}' is not an HTTP method")));
            }
        }
    }
    for method in &dispatch.forbidden_methods {
        if dispatch
            .teapot_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
        {
            errors.push(ValidationError::new(
                "dispatch.teapot_methods",
                format!("'{method}' is also listed in dispatch.forbidden_methods"),
            ));
        }
    }

    for (i, route) in config.routes.iter().enumerate() {
        if !is_token(&route.method) {
            errors.push(ValidationError::new(
                format!("routes[{i}].method"),
                format!("'{}' is not an HTTP method", route.method),
            ));
        }
        if let Err(e) = RoutePattern::new(&route.pattern) {
            errors.push(ValidationError::new(format!("routes[{i}].pattern"), e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 9110 `token`: one or more tchars.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "localhost".into();
        config.timeouts.request_secs = 0;
        config.routes.push(RouteConfig {
            method: "GE T".into(),
            pattern: "/broken(".into(),
            model: serde_json::Value::Null,
            class: None,
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "routes[0].method",
                "routes[0].pattern"
            ]
        );
    }

    #[test]
    fn test_overlapping_special_verbs() {
        let mut config = ServerConfig::default();
        config.dispatch.teapot_methods.push("trace".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dispatch.teapot_methods");
    }

    #[test]
    fn test_disabled_metrics_address_not_checked() {
        let mut config = ServerConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());
    }
}
