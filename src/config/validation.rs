//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (per-variable parsing handles syntactic)
//! - Check prefix integrity (unique, absolute)
//! - Validate value ranges (timeouts > 0, supported target schemes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate service prefix {prefix}")]
    DuplicatePrefix { prefix: String },

    #[error("service {service} prefix {prefix} must start with '/'")]
    RelativePrefix { service: String, prefix: String },

    #[error("service {service} target {target} must use http or https")]
    UnsupportedScheme { service: String, target: String },

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate the assembled configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for service in &config.services {
        if !service.prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix {
                service: service.name.clone(),
                prefix: service.prefix.clone(),
            });
        }
        if !seen.insert(service.prefix.clone()) {
            errors.push(ValidationError::DuplicatePrefix {
                prefix: service.prefix.clone(),
            });
        }
        if !matches!(service.target.scheme(), "http" | "https") {
            errors.push(ValidationError::UnsupportedScheme {
                service: service.name.clone(),
                target: service.target.to_string(),
            });
        }
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
