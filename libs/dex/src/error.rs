//! Error taxonomy for the stateful DEX core.
//!
//! Every failure aborts its operation with no partial state change. The core
//! never retries; callers resubmit with adjusted parameters if they want to.

use basin_amm::AmmError;
use basin_types::{AccountAddress, TokenAddress, U256};
use thiserror::Error;

/// Errors from exchange, registry, ledger, and routing operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DexError {
    #[error("invalid token address: the zero address names no token")]
    InvalidTokenAddress,

    #[error("pool already exists for token {0}")]
    PoolAlreadyExists(TokenAddress),

    #[error("no pool registered for token {0}")]
    UnknownPool(TokenAddress),

    #[error("insufficient token amount: liquidity requires {required}, offered {offered}")]
    InsufficientTokenAmount { required: U256, offered: U256 },

    #[error("insufficient output amount: minimum {minimum}, computed {actual}")]
    InsufficientOutputAmount { minimum: U256, actual: U256 },

    #[error("insufficient share balance: requested {requested}, held {held}")]
    InsufficientShareBalance { requested: U256, held: U256 },

    #[error("insufficient balance in account {account}")]
    InsufficientBalance { account: AccountAddress },

    #[error("insufficient allowance granted by {owner} to {spender}")]
    InsufficientAllowance {
        owner: AccountAddress,
        spender: AccountAddress,
    },

    #[error("cached reserves diverged from ledger balances for pool {pool}")]
    ReserveDesync { pool: AccountAddress },

    #[error(transparent)]
    Math(#[from] AmmError),
}
