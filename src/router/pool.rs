// src/router/pool.rs

use crate::error::RouterError;
use crate::utils::parse_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A liquidity pool exactly as the upstream query layer delivers it from the
/// chain's REST API: every numeric field is a decimal-as-string, since
/// on-chain token amounts can exceed standard integer precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub id: String,
    pub base: String,
    pub quote: String,
    pub reserve_base: String,
    pub reserve_quote: String,
    /// Swap fee as a fraction, e.g. "0.003" for 0.3%.
    pub fee: String,
}

/// Parsed, validated form of a pool used by the routing engine.
///
/// Reserves mutate on-chain after every trade; within one snapshot this
/// struct is treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pool {
    pub id: String,
    pub base: String,
    pub quote: String,
    pub reserve_base: Decimal,
    pub reserve_quote: Decimal,
    pub fee: Decimal,
}

impl Pool {
    pub fn has_denom(&self, denom: &str) -> bool {
        self.base == denom || self.quote == denom
    }

    /// The opposite side of the pool, if `denom` is one of its sides.
    pub fn other_denom(&self, denom: &str) -> Option<&str> {
        if self.base == denom {
            Some(&self.quote)
        } else if self.quote == denom {
            Some(&self.base)
        } else {
            None
        }
    }

    /// Direction-aware reserve lookup: given the input denomination,
    /// returns `(reserve_in, reserve_out)`. Swap direction is derived from
    /// which side of the pool matches the input denom, never assumed.
    pub fn reserves_for(&self, input_denom: &str) -> Option<(Decimal, Decimal)> {
        if self.base == input_denom {
            Some((self.reserve_base, self.reserve_quote))
        } else if self.quote == input_denom {
            Some((self.reserve_quote, self.reserve_base))
        } else {
            None
        }
    }

    /// A pool is usable for routing only when both reserves are positive.
    /// Zero-reserve pools provide zero output and are skipped.
    pub fn is_usable(&self) -> bool {
        self.reserve_base > Decimal::ZERO && self.reserve_quote > Decimal::ZERO
    }

    /// Geometric depth proxy used to pick between duplicate pools for the
    /// same pair.
    pub fn depth(&self) -> Decimal {
        self.reserve_base * self.reserve_quote
    }
}

impl TryFrom<&PoolSnapshot> for Pool {
    type Error = RouterError;

    fn try_from(snap: &PoolSnapshot) -> Result<Self, Self::Error> {
        let reserve_base = parse_decimal("reserve_base", &snap.reserve_base)?;
        let reserve_quote = parse_decimal("reserve_quote", &snap.reserve_quote)?;
        let fee = parse_decimal("fee", &snap.fee)?;

        if snap.base == snap.quote {
            return Err(RouterError::InvalidPoolState(format!(
                "pool {}: base and quote denom are both '{}'",
                snap.id, snap.base
            )));
        }
        if reserve_base < Decimal::ZERO || reserve_quote < Decimal::ZERO {
            return Err(RouterError::InvalidPoolState(format!(
                "pool {}: negative reserve",
                snap.id
            )));
        }
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(RouterError::InvalidPoolState(format!(
                "pool {}: fee {} outside [0, 1)",
                snap.id, fee
            )));
        }

        Ok(Pool {
            id: snap.id.clone(),
            base: snap.base.clone(),
            quote: snap.quote.clone(),
            reserve_base,
            reserve_quote,
            fee,
        })
    }
}
