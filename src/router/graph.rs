// src/router/graph.rs

use super::pool::Pool;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// Adjacency map of tradable pairs: denom -> (neighbor denom -> pool).
///
/// Bidirectional - a pool between A and B appears under both A's and B's
/// neighbor maps, since swaps flow either direction through the same pool.
/// Rebuilt in full on every snapshot update; pool counts are in the
/// hundreds, so clear-and-rebuild beats incremental patching on
/// correctness with no meaningful cost.
#[derive(Debug, Default)]
pub struct PoolGraph {
    adjacency: HashMap<String, HashMap<String, Arc<Pool>>>,
}

impl PoolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from a complete pool snapshot. Unusable
    /// (zero-reserve) pools are skipped. When several pools serve the same
    /// pair, the deepest one wins the adjacency slot.
    pub fn from_pools(pools: &[Arc<Pool>]) -> Self {
        let mut adjacency: HashMap<String, HashMap<String, Arc<Pool>>> = HashMap::new();
        let mut skipped = 0usize;

        for pool in pools {
            if !pool.is_usable() {
                debug!(
                    "Skipping pool {} ({}/{}): zero reserve",
                    pool.id, pool.base, pool.quote
                );
                skipped += 1;
                continue;
            }
            Self::link(&mut adjacency, &pool.base, &pool.quote, pool);
            Self::link(&mut adjacency, &pool.quote, &pool.base, pool);
        }

        info!(
            "Pool graph rebuilt: {} pools in, {} skipped, {} denoms",
            pools.len(),
            skipped,
            adjacency.len()
        );

        Self { adjacency }
    }

    fn link(
        adjacency: &mut HashMap<String, HashMap<String, Arc<Pool>>>,
        from: &str,
        to: &str,
        pool: &Arc<Pool>,
    ) {
        let neighbors = adjacency.entry(from.to_string()).or_default();
        match neighbors.get(to) {
            Some(existing) if existing.depth() >= pool.depth() => {}
            _ => {
                neighbors.insert(to.to_string(), Arc::clone(pool));
            }
        }
    }

    /// Neighbor denominations reachable from `denom` with their pools.
    pub fn neighbors(&self, denom: &str) -> Option<&HashMap<String, Arc<Pool>>> {
        self.adjacency.get(denom)
    }

    pub fn contains_denom(&self, denom: &str) -> bool {
        self.adjacency.contains_key(denom)
    }

    pub fn denom_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
