pub mod settings;

pub use settings::Config;

use crate::error::RouterError;
use std::sync::Arc;

/// Loads and returns the engine configuration as an `Arc<Config>`.
/// Centralizes the configuration loading process for host applications.
pub fn load_config() -> Result<Arc<settings::Config>, RouterError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = settings::Config::from_env();

    if config.max_hops_limit == 0 {
        return Err(RouterError::ConfigError(
            "ROUTER_MAX_HOPS_LIMIT must be at least 1".to_string(),
        ));
    }

    config.validate_and_log();

    Ok(Arc::new(config))
}
