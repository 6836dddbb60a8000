pub mod config;
pub mod error;
pub mod router;
pub mod utils;

// Re-export the key quoting types for easy access
pub use router::cache::{CacheStats, CachedRoute};
pub use router::engine::SwapRouter;
pub use router::pool::{Pool, PoolSnapshot};
pub use router::RouteResult;
