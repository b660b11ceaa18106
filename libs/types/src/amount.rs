//! Amount arithmetic: 256-bit unsigned integers in 18-decimal base units.
//!
//! All balances, reserves, and LP shares are `U256`. Pricing intermediates
//! (`amount * fee_numerator * reserve`) exceed 128 bits at realistic
//! 18-decimal magnitudes, which is why the engine standardizes on 256-bit
//! words rather than `u128`.

pub use ethers_core::types::U256;

/// Number of decimals in a base unit (wei-style fixed point).
pub const BASE_DECIMALS: usize = 18;

/// Scale whole units into 18-decimal base units.
pub fn wei(units: u64) -> U256 {
    U256::from(units) * U256::exp10(BASE_DECIMALS)
}
