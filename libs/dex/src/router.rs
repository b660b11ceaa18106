//! Token-to-token routing through the base currency.
//!
//! A trade from token A to token B is two legs: A -> base on the source
//! pool, base -> B on the destination pool resolved through the registry.
//! The caller's slippage minimum applies only to the final output; the
//! intermediate leg carries no minimum. Atomicity across both pools is
//! handled inside `Exchange::swap_token_for_token`.
//!
//! A routed trade needs both pool locks at once. They are always acquired
//! in ascending token order, whichever direction the trade runs, so two
//! threads routing A -> B and B -> A contend on the same first lock instead
//! of each holding one and waiting on the other.

use crate::error::DexError;
use crate::registry::PoolRegistry;
use basin_types::{AccountAddress, TokenAddress, U256};

/// Swap `token_in` of `from_token` for at least `min_other_out` of
/// `to_token`, routed through the base currency.
pub fn swap_token_for_token(
    registry: &PoolRegistry,
    caller: AccountAddress,
    from_token: TokenAddress,
    token_in: U256,
    min_other_out: U256,
    to_token: TokenAddress,
) -> Result<U256, DexError> {
    // A pool cannot route to itself.
    if to_token == from_token {
        return Err(DexError::UnknownPool(to_token));
    }
    let source = registry
        .get_exchange(from_token)
        .ok_or(DexError::UnknownPool(from_token))?;
    let dest = registry
        .get_exchange(to_token)
        .ok_or(DexError::UnknownPool(to_token))?;

    // Lock order is fixed by token address, not trade direction.
    if from_token < to_token {
        let mut src = source.write();
        let mut dst = dest.write();
        src.swap_token_for_token(&mut dst, caller, token_in, min_other_out)
    } else {
        let mut dst = dest.write();
        let mut src = source.write();
        src.swap_token_for_token(&mut dst, caller, token_in, min_other_out)
    }
}

/// Quote the final output of a two-leg trade without executing it.
///
/// Each pool is read-locked in turn, never both at once.
pub fn quote_token_for_token(
    registry: &PoolRegistry,
    from_token: TokenAddress,
    token_in: U256,
    to_token: TokenAddress,
) -> Result<U256, DexError> {
    let source = registry
        .get_exchange(from_token)
        .ok_or(DexError::UnknownPool(from_token))?;
    let dest = registry
        .get_exchange(to_token)
        .ok_or(DexError::UnknownPool(to_token))?;

    let base_mid = source.read().quote_base_out(token_in)?;
    let other_out = dest.read().quote_token_out(base_mid)?;
    Ok(other_out)
}
