//! # Basin DEX - Constant-Product Exchange Engine
//!
//! ## Purpose
//!
//! Stateful core of the Basin DEX: one [`Exchange`] per token paired against
//! the base currency, a [`PoolRegistry`] creating and indexing them, and
//! token-to-token routing through the base currency as the intermediate
//! asset. Pricing delegates to `basin-amm`; asset movement goes through the
//! injected [`AssetLedger`] and [`BaseLedger`] capabilities.
//!
//! ## Integration Points
//!
//! - **Input Sources**: liquidity and trade requests from a
//!   transaction-executing host, fee configuration from [`DexConfig`]
//! - **Output Destinations**: ledger/bank transfers, computed amounts back
//!   to the caller
//! - **Concurrency**: one `parking_lot::RwLock` per pool; every operation
//!   runs to completion under its pool's lock with no suspension points
//!
//! ## Architecture Role
//!
//! The engine is a library-level state machine: no wire protocol, no
//! persistence, no retries. Every failed operation aborts with zero state
//! change and a typed [`DexError`]; the host decides whether to resubmit.

pub mod config;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod registry;
pub mod router;

pub use config::DexConfig;
pub use error::DexError;
pub use exchange::Exchange;
pub use ledger::{AssetLedger, BaseLedger, InMemoryAssetLedger, InMemoryBank};
pub use registry::{pool_account, PoolHandle, PoolRegistry};
