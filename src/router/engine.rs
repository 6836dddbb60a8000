// src/router/engine.rs
//! The router/quoting engine.
//!
//! Route search is a best-first expansion that always grows the
//! in-progress route with the largest accumulated amount. The "edge
//! weight" (a hop's output) depends on the amount arriving at the node,
//! so this is Dijkstra-like but without the classical optimality
//! guarantee; higher intermediate output is treated as the dominant
//! heuristic. Two input amounts can legitimately select different routes
//! through the same graph, which also means cache-assisted re-simulation
//! is an approximation when the amount moves a lot.

use super::cache::{CacheStats, CachedRoute, RouteCache};
use super::graph::PoolGraph;
use super::math;
use super::pool::{Pool, PoolSnapshot};
use super::RouteResult;
use crate::config::Config;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An in-progress route during best-first expansion.
#[derive(Debug, Clone)]
struct PartialRoute {
    denom: String,
    amount: Decimal,
    path: Vec<String>,
    pools: Vec<Arc<Pool>>,
    hop_fees: Vec<Decimal>,
    hops: usize,
}

/// Router/quoting engine over a snapshot of liquidity pools.
///
/// One long-lived instance is constructed by the host's composition root
/// and shared by reference with whatever layer needs quotes. State is
/// limited to the adjacency map and the route cache; both are rebuilt or
/// cleared wholesale on every snapshot update. Reads are concurrent,
/// `update_pools` is the single writer.
pub struct SwapRouter {
    graph: RwLock<PoolGraph>,
    cache: RouteCache,
    config: Config,
}

impl Default for SwapRouter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SwapRouter {
    pub fn new(config: Config) -> Self {
        Self {
            graph: RwLock::new(PoolGraph::new()),
            cache: RouteCache::new(),
            config,
        }
    }

    /// Replaces the pool graph from a complete snapshot (not a delta) and
    /// invalidates the entire route cache, since cached routes embed pool
    /// objects whose reserves are now stale. Never fails; an empty list
    /// yields an empty graph and every subsequent query quotes no route.
    pub fn update_pools(&self, pools: Vec<Pool>) {
        let pools: Vec<Arc<Pool>> = pools.into_iter().map(Arc::new).collect();
        let rebuilt = PoolGraph::from_pools(&pools);
        {
            let mut graph = self.graph.write().unwrap_or_else(|e| e.into_inner());
            *graph = rebuilt;
        }
        self.cache.clear(None);
    }

    /// Ingests raw snapshots from the upstream query layer, skipping and
    /// logging entries that fail to parse, then swaps in the new graph.
    pub fn apply_snapshot(&self, snapshots: &[PoolSnapshot]) {
        let mut pools = Vec::with_capacity(snapshots.len());
        for snap in snapshots {
            match Pool::try_from(snap) {
                Ok(pool) => pools.push(pool),
                Err(e) => warn!("Skipping pool snapshot {}: {}", snap.id, e),
            }
        }
        info!(
            "Applying pool snapshot: {} of {} entries usable",
            pools.len(),
            snapshots.len()
        );
        self.update_pools(pools);
    }

    /// Uncached best-first route search.
    ///
    /// Returns `None` for degenerate requests (same denom, non-positive
    /// amount, zero hop budget, unknown denom) and when no path reaches
    /// `to_denom` within `max_hops`.
    pub fn find_route(
        &self,
        from_denom: &str,
        to_denom: &str,
        amount_in: Decimal,
        max_hops: usize,
    ) -> Option<RouteResult> {
        // A same-asset "swap" has no defined route.
        if from_denom == to_denom {
            return None;
        }
        if amount_in <= Decimal::ZERO || max_hops == 0 {
            return None;
        }

        let graph = self.graph.read().unwrap_or_else(|e| e.into_inner());
        if !graph.contains_denom(from_denom) || !graph.contains_denom(to_denom) {
            return None;
        }

        let mut frontier = vec![PartialRoute {
            denom: from_denom.to_string(),
            amount: amount_in,
            path: vec![from_denom.to_string()],
            pools: Vec::new(),
            hop_fees: Vec::new(),
            hops: 0,
        }];
        // Best amount seen arriving at each denom; a worse arrival can
        // never lead to a better final result through the same or fewer
        // hops.
        let mut best_seen: HashMap<String, Decimal> = HashMap::new();
        best_seen.insert(from_denom.to_string(), amount_in);
        let mut best: Option<PartialRoute> = None;

        while !frontier.is_empty() {
            // Greedy selection: largest accumulated amount first. Strict
            // comparison keeps the earliest-pushed route on ties.
            let mut idx = 0;
            for (i, candidate) in frontier.iter().enumerate().skip(1) {
                if candidate.amount > frontier[idx].amount {
                    idx = i;
                }
            }
            let current = frontier.remove(idx);

            if current.denom == to_denom {
                if best.as_ref().map_or(true, |b| current.amount > b.amount) {
                    best = Some(current);
                }
                // Never expand past the target.
                continue;
            }
            if current.hops >= max_hops {
                continue;
            }

            let neighbors = match graph.neighbors(&current.denom) {
                Some(neighbors) => neighbors,
                None => continue,
            };
            for (next_denom, pool) in neighbors {
                // No denomination is visited twice in one route.
                if current.path.iter().any(|d| d == next_denom) {
                    continue;
                }
                let outcome = math::simulate_swap(pool, &current.denom, current.amount);
                if outcome.amount_out <= Decimal::ZERO {
                    continue;
                }
                if let Some(seen) = best_seen.get(next_denom.as_str()) {
                    if outcome.amount_out <= *seen {
                        continue;
                    }
                }
                best_seen.insert(next_denom.clone(), outcome.amount_out);

                let mut extended = current.clone();
                extended.denom = next_denom.clone();
                extended.amount = outcome.amount_out;
                extended.path.push(next_denom.clone());
                extended.pools.push(Arc::clone(pool));
                extended.hop_fees.push(outcome.fee_amount);
                extended.hops += 1;
                frontier.push(extended);
            }
        }

        let winner = best?;
        debug!(
            "Route found {} -> {}: {} hops, output {}",
            from_denom, to_denom, winner.hops, winner.amount
        );
        Some(Self::finalize(winner, amount_in))
    }

    /// Cache-assisted quoting. On a hit for `(from, to, max_hops)` the
    /// cached path and pools are re-simulated against the new amount,
    /// trading search cost for simulation cost while the user adjusts
    /// amounts. Path topology only changes on snapshot refresh, and the
    /// refresh clears this cache. `use_cache` skips the lookup for one
    /// call; `Config::route_cache_enabled` disables the cache entirely.
    pub fn find_optimal_route(
        &self,
        from_denom: &str,
        to_denom: &str,
        amount_in: Decimal,
        max_hops: Option<usize>,
        use_cache: bool,
    ) -> Option<RouteResult> {
        let max_hops = max_hops
            .unwrap_or(self.config.default_max_hops)
            .min(self.config.max_hops_limit);
        if from_denom == to_denom || amount_in <= Decimal::ZERO || max_hops == 0 {
            return None;
        }

        let key = RouteCache::key(from_denom, to_denom, max_hops);
        if use_cache && self.config.route_cache_enabled {
            if let Some(cached) = self.cache.get(&key) {
                debug!("Route cache hit: {}", key);
                return Some(Self::resimulate(cached.result, amount_in));
            }
        }

        let result = self.find_route(from_denom, to_denom, amount_in, max_hops)?;
        if self.config.route_cache_enabled {
            self.cache.insert(key, result.clone());
        }
        Some(result)
    }

    pub fn clear_cache(&self, filter: Option<&dyn Fn(&str, &CachedRoute) -> bool>) {
        self.cache.clear(filter);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Attaches price impact and fee totals to a finished search route.
    fn finalize(route: PartialRoute, amount_in: Decimal) -> RouteResult {
        let (without_fees, with_fees) =
            math::theoretical_outputs(&route.pools, &route.path, amount_in);
        RouteResult {
            route: route.pools.iter().map(|p| p.id.clone()).collect(),
            path: route.path,
            pools: route.pools,
            expected_output: route.amount,
            price_impact: math::price_impact_pct(route.amount, with_fees),
            total_fees: without_fees - with_fees,
            hop_fees: route.hop_fees,
        }
    }

    /// Re-runs whole-route simulation over cached path/pools with a fresh
    /// input amount, keeping the cached route metadata.
    fn resimulate(cached: RouteResult, amount_in: Decimal) -> RouteResult {
        let sim = math::simulate_route(&cached.pools, &cached.path, amount_in);
        let (without_fees, with_fees) =
            math::theoretical_outputs(&cached.pools, &cached.path, amount_in);
        RouteResult {
            expected_output: sim.expected_output,
            price_impact: math::price_impact_pct(sim.expected_output, with_fees),
            total_fees: without_fees - with_fees,
            hop_fees: sim.hop_fees,
            ..cached
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn pool(id: &str, base: &str, quote: &str, rb: i64, rq: i64, fee: &str) -> Pool {
        Pool::try_from(&PoolSnapshot {
            id: id.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
            reserve_base: rb.to_string(),
            reserve_quote: rq.to_string(),
            fee: fee.to_string(),
        })
        .unwrap()
    }

    fn router_with(pools: Vec<Pool>) -> SwapRouter {
        let router = SwapRouter::default();
        router.update_pools(pools);
        router
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_same_denom_returns_none() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        assert!(router
            .find_optimal_route("usd", "usd", Decimal::from(1000), Some(3), true)
            .is_none());
    }

    #[test]
    fn test_zero_and_negative_amount_return_none() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        assert!(router
            .find_optimal_route("usd", "eur", Decimal::ZERO, Some(3), true)
            .is_none());
        assert!(router
            .find_optimal_route("usd", "eur", Decimal::from(-10), Some(3), true)
            .is_none());
    }

    #[test]
    fn test_direct_route_values() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        let result = router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), true)
            .unwrap();
        assert_eq!(result.route, vec!["p1".to_string()]);
        assert_eq!(result.path, vec!["usd".to_string(), "eur".to_string()]);
        assert_eq!(result.hop_fees, vec![Decimal::from(3)]);
        assert!((result.expected_output - dec("896.4062829359")).abs() < dec("0.0000001"));
        // total fees in output-denom terms: 900 - 897.3
        assert_eq!(result.total_fees, dec("2.7"));
        assert!(result.price_impact > Decimal::ZERO);
    }

    #[test]
    fn test_two_hop_route_when_no_direct_pool() {
        let router = router_with(vec![
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
        ]);
        let result = router
            .find_optimal_route("usd", "gbp", Decimal::from(1000), Some(2), true)
            .unwrap();
        assert_eq!(result.route, vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(
            result.path,
            vec!["usd".to_string(), "eur".to_string(), "gbp".to_string()]
        );
        assert_eq!(result.hop_fees.len(), 2);
        assert!(result.expected_output > Decimal::ZERO);

        // Same graph, hop budget too small: no route.
        assert!(router
            .find_optimal_route("usd", "gbp", Decimal::from(1000), Some(1), true)
            .is_none());
    }

    #[test]
    fn test_hop_bound_respected_and_paths_cycle_free() {
        let router = router_with(vec![
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
            pool("p3", "gbp", "jpy", 800_000, 120_000_000, "0.003"),
            pool("p4", "usd", "gbp", 500_000, 400_000, "0.003"),
        ]);
        for max_hops in 1..=4usize {
            if let Some(result) =
                router.find_optimal_route("usd", "jpy", Decimal::from(1000), Some(max_hops), false)
            {
                assert!(result.hop_count() <= max_hops);
                let mut seen = std::collections::HashSet::new();
                for denom in &result.path {
                    assert!(seen.insert(denom.clone()), "denom {} repeated", denom);
                }
            }
        }
    }

    #[test]
    fn test_search_prefers_higher_output_route() {
        // Direct pool is nearly drained; the 2-hop route through deep
        // pools pays far more.
        let router = router_with(vec![
            pool("direct", "usd", "gbp", 100, 80, "0.003"),
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
        ]);
        let result = router
            .find_optimal_route("usd", "gbp", Decimal::from(1000), Some(2), true)
            .unwrap();
        assert_eq!(result.route, vec!["p1".to_string(), "p2".to_string()]);

        // With a 1-hop budget only the drained pool qualifies.
        let direct = router
            .find_optimal_route("usd", "gbp", Decimal::from(1000), Some(1), false)
            .unwrap();
        assert_eq!(direct.route, vec!["direct".to_string()]);
        assert!(direct.expected_output < result.expected_output);
    }

    #[test]
    fn test_unknown_denoms_return_none() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        assert!(router
            .find_optimal_route("usd", "xxx", Decimal::from(10), Some(3), true)
            .is_none());
        assert!(router
            .find_optimal_route("xxx", "eur", Decimal::from(10), Some(3), true)
            .is_none());
    }

    #[test]
    fn test_cache_hit_resimulates_same_path() {
        let router = router_with(vec![
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
        ]);
        let first = router
            .find_optimal_route("usd", "gbp", Decimal::from(1000), Some(2), true)
            .unwrap();
        assert_eq!(router.cache_stats().size, 1);

        let second = router
            .find_optimal_route("usd", "gbp", Decimal::from(50_000), Some(2), true)
            .unwrap();
        // Same topology, freshly simulated amounts.
        assert_eq!(second.route, first.route);
        assert_eq!(second.path, first.path);
        assert!(second.expected_output > first.expected_output);
        // Larger trades move the reserves further: impact must grow.
        assert!(second.price_impact > first.price_impact);
        // Still a single cache entry for the key.
        assert_eq!(router.cache_stats().size, 1);
    }

    #[test]
    fn test_cache_bypass_and_distinct_keys() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(2), false)
            .unwrap();
        router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), false)
            .unwrap();
        let stats = router.cache_stats();
        assert_eq!(stats.size, 2);
        assert!(stats.keys.contains(&"usd->eur:2".to_string()));
        assert!(stats.keys.contains(&"usd->eur:3".to_string()));
    }

    #[test]
    fn test_update_pools_invalidates_cache() {
        let router = router_with(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        let before = router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), true)
            .unwrap();
        assert_eq!(router.cache_stats().size, 1);

        // Reserves moved on-chain; the same quote must reflect them.
        router.update_pools(vec![pool("p1", "usd", "eur", 2_000_000, 900_000, "0.003")]);
        assert_eq!(router.cache_stats().size, 0);
        let after = router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), true)
            .unwrap();
        assert!(after.expected_output < before.expected_output);
    }

    #[test]
    fn test_empty_graph_quotes_nothing() {
        let router = SwapRouter::default();
        assert!(router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), true)
            .is_none());
        router.update_pools(vec![]);
        assert!(router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(3), true)
            .is_none());
    }

    #[test]
    fn test_default_max_hops_comes_from_config() {
        // usd -> jpy needs 3 hops; a config default of 2 must miss it.
        let config = Config {
            default_max_hops: 2,
            ..Config::default()
        };
        let router = SwapRouter::new(config);
        router.update_pools(vec![
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
            pool("p3", "gbp", "jpy", 800_000, 120_000_000, "0.003"),
        ]);
        assert!(router
            .find_optimal_route("usd", "jpy", Decimal::from(1000), None, true)
            .is_none());
        assert!(router
            .find_optimal_route("usd", "jpy", Decimal::from(1000), Some(3), true)
            .is_some());
    }

    #[test]
    fn test_cache_disabled_by_config() {
        let config = Config {
            route_cache_enabled: false,
            ..Config::default()
        };
        let router = SwapRouter::new(config);
        router.update_pools(vec![pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003")]);
        router
            .find_optimal_route("usd", "eur", Decimal::from(1000), Some(2), true)
            .unwrap();
        assert_eq!(router.cache_stats().size, 0);
    }

    #[test]
    fn test_max_hops_clamped_to_limit() {
        let config = Config {
            default_max_hops: 3,
            max_hops_limit: 2,
            ..Config::default()
        };
        let router = SwapRouter::new(config);
        router.update_pools(vec![
            pool("p1", "usd", "eur", 1_000_000, 900_000, "0.003"),
            pool("p2", "eur", "gbp", 900_000, 800_000, "0.003"),
            pool("p3", "gbp", "jpy", 800_000, 120_000_000, "0.003"),
        ]);
        // Request 5 hops, limit caps at 2: 3-hop route unreachable.
        assert!(router
            .find_optimal_route("usd", "jpy", Decimal::from(1000), Some(5), true)
            .is_none());
    }
}
