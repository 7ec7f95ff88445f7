//! The immutable route table.

use url::Url;

use crate::config::ServiceConfig;

/// A single routing entry: one upstream service behind one path prefix.
#[derive(Debug, Clone)]
pub struct Route {
    /// Service identifier for logs and metrics.
    pub service: String,

    /// Literal path prefix the route matches (e.g. "/notion").
    pub prefix: String,

    /// Upstream base URL the prefix-stripped request is forwarded to.
    pub target: Url,
}

/// Mapping from path prefixes to upstream targets.
///
/// Built once from configuration at startup and shared read-only for the
/// process lifetime; there is no dynamic registration.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from the configured service registry, preserving
    /// configuration order.
    pub fn from_config(services: &[ServiceConfig]) -> Self {
        let routes = services
            .iter()
            .map(|s| Route {
                service: s.name.clone(),
                prefix: s.prefix.clone(),
                target: s.target.clone(),
            })
            .collect();
        Self { routes }
    }

    /// Look up the route for a request path.
    ///
    /// Returns the matched route and the prefix-stripped suffix. A path
    /// matches when it equals the prefix exactly (suffix "/") or continues
    /// with a path separator, so "/notionx" never matches "/notion".
    pub fn match_path<'p>(&self, path: &'p str) -> Option<(&Route, &'p str)> {
        for route in &self.routes {
            if let Some(rest) = path.strip_prefix(route.prefix.as_str()) {
                if rest.is_empty() {
                    return Some((route, "/"));
                }
                if rest.starts_with('/') {
                    return Some((route, rest));
                }
            }
        }
        None
    }

    /// Gateway-relative mount paths, used by the 404 body.
    pub fn mount_paths(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.prefix.clone()).collect()
    }

    /// All routes in matching order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
