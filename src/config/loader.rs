//! Configuration loading from the environment.

use std::env;

use url::Url;

use crate::config::schema::{default_services, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: String, reason: String },

    /// Semantic validation rejected the assembled configuration.
    #[error("configuration validation failed ({} error(s))", .0.len())]
    Validation(Vec<ValidationError>),
}

/// Assemble and validate the gateway configuration from the environment.
///
/// Every variable has a documented default; an unset upstream variable falls
/// back to its conventional container hostname and the fallback is logged at
/// WARN so misconfiguration is visible in startup logs. A variable that is
/// set but unparseable is an error, not a silent fallback.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    if let Ok(host) = env::var("GATEWAY_HOST") {
        config.listener.host = host;
    }
    if let Some(port) = parse_var("GATEWAY_PORT")? {
        config.listener.port = port;
    }
    if let Some(secs) = parse_var("GATEWAY_UPSTREAM_TIMEOUT_SECS")? {
        config.timeouts.upstream_secs = secs;
    }

    config.services = default_services();
    for service in &mut config.services {
        match env::var(&service.env_var) {
            Ok(raw) => {
                service.target = Url::parse(&raw).map_err(|e| ConfigError::InvalidVar {
                    var: service.env_var.clone(),
                    reason: e.to_string(),
                })?;
            }
            Err(_) => {
                tracing::warn!(
                    service = %service.name,
                    var = %service.env_var,
                    default = %service.display_target(),
                    "Upstream variable unset, using default target"
                );
            }
        }
    }

    if let Ok(level) = env::var("GATEWAY_LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(enabled) = parse_bool_var("GATEWAY_METRICS_ENABLED")? {
        config.observability.metrics_enabled = enabled;
    }
    if let Ok(addr) = env::var("GATEWAY_METRICS_ADDRESS") {
        config.observability.metrics_address = addr;
    }

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "Configuration validation error");
        }
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Parse an optional variable with `FromStr`; unset means `None`.
fn parse_var<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool_var(var: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(ConfigError::InvalidVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got {other:?}"),
            }),
        },
        Err(_) => Ok(None),
    }
}
