// src/router/cache.rs

use super::RouteResult;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use serde::Serialize;

/// A cached route plus the moment it was computed.
///
/// Entries are never expired by time; the engine clears the whole cache on
/// every pool snapshot update, because cached routes embed pool objects
/// whose reserves go stale the moment a trade lands on-chain.
#[derive(Debug, Clone)]
pub struct CachedRoute {
    pub result: RouteResult,
    pub cached_at: DateTime<Utc>,
}

/// Diagnostic snapshot of the cache contents.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Concurrent route cache keyed by `(from, to, max_hops)`.
#[derive(Debug, Default)]
pub struct RouteCache {
    entries: DashMap<String, CachedRoute>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(from_denom: &str, to_denom: &str, max_hops: usize) -> String {
        format!("{}->{}:{}", from_denom, to_denom, max_hops)
    }

    pub fn get(&self, key: &str) -> Option<CachedRoute> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn insert(&self, key: String, result: RouteResult) {
        self.entries.insert(
            key,
            CachedRoute {
                result,
                cached_at: Utc::now(),
            },
        );
    }

    /// With no filter, drops everything. With a filter, drops only the
    /// entries it matches - supports clearing by denomination substring or
    /// by entry age.
    pub fn clear(&self, filter: Option<&dyn Fn(&str, &CachedRoute) -> bool>) {
        match filter {
            None => {
                let dropped = self.entries.len();
                self.entries.clear();
                debug!("Route cache cleared ({} entries)", dropped);
            }
            Some(filter) => {
                let before = self.entries.len();
                self.entries.retain(|key, entry| !filter(key.as_str(), entry));
                debug!(
                    "Route cache filtered: {} of {} entries dropped",
                    before - self.entries.len(),
                    before
                );
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            keys: self.entries.iter().map(|e| e.key().clone()).collect(),
        }
    }
}
