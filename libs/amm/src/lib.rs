//! # Basin AMM Library - Constant-Product Pricing Engine
//!
//! ## Purpose
//!
//! Pure mathematical core for the Basin DEX: fee-adjusted constant-product
//! (x*y=k) swap pricing with deterministic integer rounding. Every quantity
//! is a non-negative 256-bit integer in 18-decimal base units and every
//! division is truncating, so the no-value-creation invariant holds exactly
//! with no accumulated rounding error.
//!
//! ## Integration Points
//!
//! - **Input Sources**: reserve pairs and trade amounts from `basin-dex`
//!   exchanges, fee parameters from pool configuration
//! - **Output Destinations**: exchange swap execution, slippage validation,
//!   off-chain price queries
//! - **Precision**: floor division throughout; the fee is taken from the
//!   input side before the constant-product formula is applied
//!
//! ## Architecture Role
//!
//! This crate holds no state and performs no I/O. The stateful exchange in
//! `basin-dex` delegates every price computation here, which is what makes
//! the product invariant auditable in one place.

pub mod fee;
pub mod math;

pub use fee::SwapFee;
pub use math::{input_amount, output_amount, price_ratio, AmmError, PRICE_SCALE};

/// Common amount type for AMM calculations.
pub use basin_types::U256;
