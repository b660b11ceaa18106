//! Swap fee parameterization.
//!
//! The fee is a rational multiplier applied to the input side of a swap:
//! `numerator / denominator` is the fraction of the input that participates
//! in the constant-product formula, so `999/1000` keeps 99.9% and charges a
//! 0.1% fee. The ratio is a pool parameter rather than a hard-coded
//! constant; observed deployments differ (0.1% vs the conventional 0.3%).

use crate::math::AmmError;
use serde::{Deserialize, Serialize};

/// Input-side swap fee expressed as a retained-fraction ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapFee {
    numerator: u64,
    denominator: u64,
}

impl SwapFee {
    /// Default retained fraction: 999/1000, a 0.1% input-side fee.
    pub const DEFAULT_NUMERATOR: u64 = 999;
    pub const DEFAULT_DENOMINATOR: u64 = 1000;

    /// Build a fee ratio. The retained fraction must be in `(0, 1]`.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, AmmError> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(AmmError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(SwapFee {
            numerator,
            denominator,
        })
    }

    /// Build from a charge in basis points (30 bps = 0.3% = 9970/10000).
    pub fn from_bps(fee_bps: u32) -> Result<Self, AmmError> {
        let bps = u64::from(fee_bps);
        if bps >= 10_000 {
            return Err(AmmError::InvalidFee {
                numerator: 10_000u64.saturating_sub(bps),
                denominator: 10_000,
            });
        }
        Self::new(10_000 - bps, 10_000)
    }

    /// The zero-fee limit: every swap preserves the product exactly.
    pub fn free() -> Self {
        SwapFee {
            numerator: 1,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        SwapFee {
            numerator: Self::DEFAULT_NUMERATOR,
            denominator: Self::DEFAULT_DENOMINATOR,
        }
    }
}
