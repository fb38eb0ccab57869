//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, address parses)
//! - Check every declared route: verbs, pattern, handler string
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::dispatch::{HandlerError, HandlerRef};
use crate::routing::{self, RouteError, UnknownVerb, Verb};

/// A single semantic problem in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("separator `{0}` is not allowed")]
    Separator(char),

    #[error("default method must not be empty")]
    EmptyDefaultMethod,

    #[error("route #{index} declares no methods")]
    NoMethods { index: usize },

    #[error("route #{index}: {source}")]
    Verb {
        index: usize,
        #[source]
        source: UnknownVerb,
    },

    #[error("route #{index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("route #{index}: {source}")]
    Handler {
        index: usize,
        #[source]
        source: HandlerError,
    },
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let separator = config.dispatch.separator;
    if separator.is_alphanumeric() || separator.is_whitespace() || matches!(separator, '{' | '}' | '/' | '_') {
        errors.push(ValidationError::Separator(separator));
    }
    if config.dispatch.default_method.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultMethod);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if route.methods.is_empty() {
            errors.push(ValidationError::NoMethods { index });
        }
        for method in &route.methods {
            if let Err(source) = method.parse::<Verb>() {
                errors.push(ValidationError::Verb { index, source });
            }
        }
        if let Err(source) = routing::compile(&route.pattern) {
            errors.push(ValidationError::Pattern { index, source });
        }
        if let Err(source) = HandlerRef::parse(&route.handler, separator) {
            errors.push(ValidationError::Handler { index, source });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(methods: &[&str], pattern: &str, handler: &str) -> RouteConfig {
        RouteConfig {
            methods: methods.iter().map(|m| m.to_string()).collect(),
            pattern: pattern.to_string(),
            handler: handler.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.server.bind_address = "not-an-address".into();
        config.server.request_timeout_secs = 0;
        config.routes.push(route(&["GET", "get"], "/a/{id", "@x"));
        config.routes.push(route(&[], "/ok", "echo"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(matches!(errors[0], ValidationError::BindAddress(_)));
        assert!(matches!(errors[1], ValidationError::ZeroTimeout));
        assert!(matches!(errors[2], ValidationError::Verb { index: 0, .. }));
        assert!(matches!(errors[3], ValidationError::Pattern { index: 0, .. }));
        assert!(matches!(errors[4], ValidationError::Handler { index: 0, .. }));
        assert!(matches!(errors[5], ValidationError::NoMethods { index: 1 }));
    }

    #[test]
    fn test_rejects_separator() {
        let mut config = AppConfig::default();
        config.dispatch.separator = 'x';
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Separator('x')));
    }
}
