// src/router/math.rs
//! Constant-product swap simulation.
//!
//! All arithmetic is `Decimal`; quoting never touches floating point.
//! Fees are taken on the input side before the invariant calculation,
//! matching the on-chain module's semantics.

use super::pool::Pool;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Result of pushing an amount through a single pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapOutcome {
    pub amount_out: Decimal,
    /// Fee charged, denominated in the hop's input denomination.
    pub fee_amount: Decimal,
}

impl SwapOutcome {
    pub fn zero() -> Self {
        Self {
            amount_out: Decimal::ZERO,
            fee_amount: Decimal::ZERO,
        }
    }
}

/// Output of simulating a full multi-hop route.
#[derive(Debug, Clone)]
pub struct RouteSimulation {
    pub expected_output: Decimal,
    /// One fee per hop, each in that hop's input denomination. These are
    /// not summable directly - every entry is a different denom.
    pub hop_fees: Vec<Decimal>,
}

/// Simulates swapping `amount_in` of `input_denom` through `pool`.
///
/// `amount_out = in_after_fee * reserve_out / (reserve_in + in_after_fee)`
///
/// Degenerate inputs (unusable pool, denom not in pool, non-positive
/// amount) yield a zero outcome rather than an error; the search layer
/// prunes zero-output hops.
pub fn simulate_swap(pool: &Pool, input_denom: &str, amount_in: Decimal) -> SwapOutcome {
    if amount_in <= Decimal::ZERO || !pool.is_usable() {
        return SwapOutcome::zero();
    }
    let (reserve_in, reserve_out) = match pool.reserves_for(input_denom) {
        Some(r) => r,
        None => return SwapOutcome::zero(),
    };

    let fee_amount = amount_in * pool.fee;
    let amount_in_after_fee = amount_in - fee_amount;
    let amount_out = amount_in_after_fee * reserve_out / (reserve_in + amount_in_after_fee);

    SwapOutcome {
        amount_out,
        fee_amount,
    }
}

/// Chains `simulate_swap` along `path`, feeding each hop's output into the
/// next hop. `path` holds the visited denominations including start and
/// end, so `path.len() == pools.len() + 1`.
pub fn simulate_route(pools: &[Arc<Pool>], path: &[String], amount_in: Decimal) -> RouteSimulation {
    let mut amount = amount_in;
    let mut hop_fees = Vec::with_capacity(pools.len());

    for (pool, input_denom) in pools.iter().zip(path.iter()) {
        let outcome = simulate_swap(pool, input_denom, amount);
        hop_fees.push(outcome.fee_amount);
        amount = outcome.amount_out;
        if amount <= Decimal::ZERO {
            // Route broken; remaining hops would all be zero anyway.
            amount = Decimal::ZERO;
            while hop_fees.len() < pools.len() {
                hop_fees.push(Decimal::ZERO);
            }
            break;
        }
    }

    RouteSimulation {
        expected_output: amount,
        hop_fees,
    }
}

/// No-slippage baseline: multiplies `amount_in` through each hop's
/// mid-price (`reserve_out / reserve_in`), once ignoring fees and once
/// applying each hop's fee rate multiplicatively.
///
/// Returns `(without_fees, with_fees)`, both in the final output
/// denomination.
pub fn theoretical_outputs(
    pools: &[Arc<Pool>],
    path: &[String],
    amount_in: Decimal,
) -> (Decimal, Decimal) {
    let mut without_fees = amount_in;
    let mut with_fees = amount_in;

    for (pool, input_denom) in pools.iter().zip(path.iter()) {
        let (reserve_in, reserve_out) = match pool.reserves_for(input_denom) {
            Some((rin, rout)) if rin > Decimal::ZERO => (rin, rout),
            _ => return (Decimal::ZERO, Decimal::ZERO),
        };
        let mid_price = reserve_out / reserve_in;
        without_fees *= mid_price;
        with_fees *= mid_price * (Decimal::ONE - pool.fee);
    }

    (without_fees, with_fees)
}

/// Slippage isolated from fee cost: how far the actual output fell below
/// the fee-adjusted no-slippage baseline, as a percentage. Zero when the
/// baseline itself is zero.
pub fn price_impact_pct(actual_output: Decimal, theoretical_with_fees: Decimal) -> Decimal {
    if theoretical_with_fees.is_zero() {
        return Decimal::ZERO;
    }
    (theoretical_with_fees - actual_output) / theoretical_with_fees * Decimal::ONE_HUNDRED
}
