//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits; `Default` impls carry the documented
//! fallback values used when an environment variable is unset.

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream service registry, in routing order.
    pub services: Vec<ServiceConfig>,

    /// Timeout configuration for upstream calls.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: default_services(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g. "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl ListenerConfig {
    /// Full bind address, suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// A single upstream MCP service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier, used in logs and metrics labels.
    pub name: String,

    /// Gateway-relative mount path (e.g. "/notion"). Stripped before
    /// forwarding.
    pub prefix: String,

    /// Environment variable the target is resolved from.
    pub env_var: String,

    /// Upstream base URL.
    pub target: Url,

    /// Short human-readable description, surfaced by `/services`.
    pub description: String,
}

impl ServiceConfig {
    /// Target rendered without the trailing slash `Url` adds to bare
    /// authorities, for display in introspection payloads.
    pub fn display_target(&self) -> String {
        let rendered = self.target.as_str();
        if self.target.path() == "/" {
            rendered.trim_end_matches('/').to_string()
        } else {
            rendered.to_string()
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for an upstream request in seconds.
    pub upstream_secs: u64,

    /// WebSocket upstream connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 30,
            connect_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
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

/// The fixed fleet of upstream MCP services, in routing order.
///
/// Default targets point at the conventional container hostnames used by the
/// deployment (`<service>-mcp:3000`); each is overridable via its variable.
pub fn default_services() -> Vec<ServiceConfig> {
    const FLEET: [(&str, &str, &str); 5] = [
        (
            "notion",
            "NOTION_MCP_URL",
            "Notion workspace pages, tasks, and documentation",
        ),
        (
            "github",
            "GITHUB_MCP_URL",
            "GitHub repositories, issues, and pull requests",
        ),
        (
            "filesystem",
            "FILESYSTEM_MCP_URL",
            "File operations for content management",
        ),
        (
            "analytics",
            "ANALYTICS_MCP_URL",
            "Social media promotion and analytics",
        ),
        (
            "drive",
            "DRIVE_MCP_URL",
            "Google Drive document storage and retrieval",
        ),
    ];

    FLEET
        .iter()
        .map(|(name, env_var, description)| ServiceConfig {
            name: name.to_string(),
            prefix: format!("/{name}"),
            env_var: env_var.to_string(),
            target: Url::parse(&format!("http://{name}-mcp:3000"))
                .expect("default upstream URL is well-formed"),
            description: description.to_string(),
        })
        .collect()
}
