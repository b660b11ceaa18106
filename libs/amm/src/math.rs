//! Constant-product swap pricing with exact integer arithmetic.
//!
//! The core primitive is [`output_amount`]:
//!
//! ```text
//! out = (in * fee_num * reserve_out) / (reserve_in * fee_den + in * fee_num)
//! ```
//!
//! with floor division throughout. The fee is taken from the input before
//! the x*y=k formula applies, so each swap leaves the reserve product
//! non-decreasing (strictly increasing whenever fee and input are nonzero).

use crate::fee::SwapFee;
use basin_types::U256;
use thiserror::Error;

/// Errors from pure pricing queries.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    #[error("pricing query against empty reserves")]
    EmptyReserves,

    #[error("division by zero in price ratio")]
    DivisionByZero,

    #[error("requested output meets or exceeds available reserves")]
    InsufficientLiquidity,

    #[error("invalid fee ratio: {numerator}/{denominator}")]
    InvalidFee { numerator: u64, denominator: u64 },

    #[error("arithmetic overflow in pricing calculation")]
    Overflow,
}

/// Fixed scale applied by [`price_ratio`].
pub const PRICE_SCALE: u64 = 1000;

/// Fee-adjusted constant-product output for an exact input.
///
/// Monotonically increasing in `amount_in` and always strictly below the
/// fee-free constant-product output for a positive fee and positive input.
pub fn output_amount(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: SwapFee,
) -> Result<U256, AmmError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::EmptyReserves);
    }

    let fee_num = U256::from(fee.numerator());
    let fee_den = U256::from(fee.denominator());

    let amount_with_fee = amount_in.checked_mul(fee_num).ok_or(AmmError::Overflow)?;
    let numerator = amount_with_fee
        .checked_mul(reserve_out)
        .ok_or(AmmError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(fee_den)
        .ok_or(AmmError::Overflow)?
        .checked_add(amount_with_fee)
        .ok_or(AmmError::Overflow)?;

    Ok(numerator / denominator)
}

/// Fee-adjusted input required for an exact output, rounded up.
///
/// The +1 rounds in the pool's favor so that paying the returned amount
/// always yields at least `amount_out`.
pub fn input_amount(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: SwapFee,
) -> Result<U256, AmmError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::EmptyReserves);
    }
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let fee_num = U256::from(fee.numerator());
    let fee_den = U256::from(fee.denominator());

    let numerator = reserve_in
        .checked_mul(amount_out)
        .ok_or(AmmError::Overflow)?
        .checked_mul(fee_den)
        .ok_or(AmmError::Overflow)?;
    let denominator = (reserve_out - amount_out)
        .checked_mul(fee_num)
        .ok_or(AmmError::Overflow)?;

    Ok(numerator / denominator + U256::one())
}

/// Display price of `reserve_a` in terms of `reserve_b`, scaled by
/// [`PRICE_SCALE`]. Pass reserves in either order to quote either direction.
pub fn price_ratio(reserve_a: U256, reserve_b: U256) -> Result<U256, AmmError> {
    if reserve_b.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let scaled = reserve_a
        .checked_mul(U256::from(PRICE_SCALE))
        .ok_or(AmmError::Overflow)?;
    Ok(scaled / reserve_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use basin_types::wei;

    fn u(value: u64) -> U256 {
        U256::from(value)
    }

    #[test]
    fn output_matches_reference_vectors_base_to_token() {
        // 18-decimal pool: 1000 base / 2000 token, fee 999/1000.
        let fee = SwapFee::default();
        let reserve_in = wei(1000);
        let reserve_out = wei(2000);

        assert_eq!(
            output_amount(wei(1), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("1996005990015974041").unwrap()
        );
        assert_eq!(
            output_amount(wei(100), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("181652877534321301936").unwrap()
        );
        assert_eq!(
            output_amount(wei(1000), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("999499749874937468734").unwrap()
        );
    }

    #[test]
    fn output_matches_reference_vectors_token_to_base() {
        // Same pool quoted in the other direction: 2000 token / 1000 base.
        let fee = SwapFee::default();
        let reserve_in = wei(2000);
        let reserve_out = wei(1000);

        assert_eq!(
            output_amount(wei(2), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("998002995007987020").unwrap()
        );
        assert_eq!(
            output_amount(wei(100), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("47573693985427877517").unwrap()
        );
        assert_eq!(
            output_amount(wei(2000), reserve_in, reserve_out, fee).unwrap(),
            U256::from_dec_str("499749874937468734367").unwrap()
        );
    }

    #[test]
    fn output_fails_on_empty_reserves() {
        let fee = SwapFee::default();
        assert_eq!(
            output_amount(u(10), U256::zero(), u(100), fee),
            Err(AmmError::EmptyReserves)
        );
        assert_eq!(
            output_amount(u(10), u(100), U256::zero(), fee),
            Err(AmmError::EmptyReserves)
        );
    }

    #[test]
    fn output_is_monotonic_and_below_fee_free() {
        let fee = SwapFee::default();
        let small = output_amount(wei(1), wei(1000), wei(2000), fee).unwrap();
        let large = output_amount(wei(10), wei(1000), wei(2000), fee).unwrap();
        assert!(large > small);

        let fee_free = output_amount(wei(10), wei(1000), wei(2000), SwapFee::free()).unwrap();
        assert!(large < fee_free);
    }

    #[test]
    fn zero_input_prices_to_zero() {
        let fee = SwapFee::default();
        assert_eq!(
            output_amount(U256::zero(), wei(1000), wei(2000), fee).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn swap_never_decreases_reserve_product() {
        let fee = SwapFee::default();
        let (reserve_in, reserve_out) = (wei(1000), wei(2000));
        let amount_in = wei(37);

        let out = output_amount(amount_in, reserve_in, reserve_out, fee).unwrap();
        let k_before = reserve_in * reserve_out;
        let k_after = (reserve_in + amount_in) * (reserve_out - out);
        assert!(k_after > k_before);

        // Zero-fee limit: the product may only grow by rounding dust.
        let out_free = output_amount(amount_in, reserve_in, reserve_out, SwapFee::free()).unwrap();
        let k_free = (reserve_in + amount_in) * (reserve_out - out_free);
        assert!(k_free >= k_before);
    }

    #[test]
    fn input_amount_covers_requested_output() {
        let fee = SwapFee::default();
        let (reserve_in, reserve_out) = (wei(1000), wei(2000));
        let wanted = wei(50);

        let needed = input_amount(wanted, reserve_in, reserve_out, fee).unwrap();
        let got = output_amount(needed, reserve_in, reserve_out, fee).unwrap();
        assert!(got >= wanted);
    }

    #[test]
    fn input_amount_rejects_draining_output() {
        let fee = SwapFee::default();
        assert_eq!(
            input_amount(wei(2000), wei(1000), wei(2000), fee),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            input_amount(u(1), U256::zero(), u(100), fee),
            Err(AmmError::EmptyReserves)
        );
    }

    #[test]
    fn price_ratio_scales_by_1000() {
        assert_eq!(price_ratio(wei(200), wei(100)).unwrap(), u(2000));
        assert_eq!(price_ratio(wei(100), wei(200)).unwrap(), u(500));
        // Floor division: 100/300 scaled is 333, not 333.33.
        assert_eq!(price_ratio(wei(100), wei(300)).unwrap(), u(333));
    }

    #[test]
    fn price_ratio_rejects_zero_divisor() {
        assert_eq!(
            price_ratio(wei(100), U256::zero()),
            Err(AmmError::DivisionByZero)
        );
    }
}
