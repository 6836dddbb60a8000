//! AMM Swap Router
//!
//! Multi-hop route discovery and quoting over a snapshot of constant-product
//! liquidity pools. The engine owns an adjacency map of tradable pairs,
//! finds the best route between two denominations for a given input amount,
//! simulates per-hop execution with fees, and caches routes for reuse
//! across amount changes.
//!
//! The engine is pure computation over in-memory data: pool snapshots are
//! pushed in by an external query layer, and quoting performs no I/O.

pub mod cache;
pub mod engine;
pub mod graph;
pub mod math;
pub mod pool;

use pool::Pool;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A fully quoted multi-hop route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    /// Ordered pool identifiers used by the route.
    pub route: Vec<String>,
    /// Ordered denominations visited, start and end included;
    /// `path.len() == route.len() + 1`.
    pub path: Vec<String>,
    /// The pools themselves, retained so the result can be re-simulated
    /// against a new input amount without re-searching.
    pub pools: Vec<Arc<Pool>>,
    /// Simulated output after slippage and fees, in the target denom.
    pub expected_output: Decimal,
    /// Slippage as a percentage of the fee-adjusted no-slippage baseline.
    pub price_impact: Decimal,
    /// Fee cost in output-denomination-equivalent terms, assuming no
    /// slippage.
    pub total_fees: Decimal,
    /// Per-hop fee amounts, each in its own hop's input denomination.
    /// Not summable to `total_fees` - the denominations differ.
    pub hop_fees: Vec<Decimal>,
}

impl RouteResult {
    pub fn hop_count(&self) -> usize {
        self.route.len()
    }
}
