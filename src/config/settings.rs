use std::env;

/// Runtime configuration for the quoting engine.
///
/// Every field has a working default so the engine can be constructed in
/// tests or embedded hosts without any environment set up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hop bound applied when the caller does not pass one explicitly.
    pub default_max_hops: usize,
    /// Hard ceiling on the hop bound. Search cost grows with
    /// (neighbors per denom)^max_hops, so this stays small.
    pub max_hops_limit: usize,
    /// Whether cache-assisted quoting is enabled by default.
    pub route_cache_enabled: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_hops: 3,
            max_hops_limit: 4,
            route_cache_enabled: true,
            log_level: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            default_max_hops: env::var("ROUTER_DEFAULT_MAX_HOPS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            max_hops_limit: env::var("ROUTER_MAX_HOPS_LIMIT")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            route_cache_enabled: env::var("ROUTER_CACHE_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            log_level: env::var("LOG_LEVEL").ok(),
        }
    }

    pub fn validate_and_log(&self) {
        log::info!("Router Configuration Loaded: {:?}", self);
        if self.default_max_hops == 0 {
            log::error!("ROUTER_DEFAULT_MAX_HOPS must be at least 1; routing will return no routes.");
        }
        if self.max_hops_limit < self.default_max_hops {
            log::warn!(
                "ROUTER_MAX_HOPS_LIMIT ({}) is below ROUTER_DEFAULT_MAX_HOPS ({}); the limit wins.",
                self.max_hops_limit,
                self.default_max_hops
            );
        }
    }
}
