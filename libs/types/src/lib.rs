//! # Basin Types - Shared Primitives
//!
//! Foundational types shared by every Basin crate: 20-byte addresses for
//! tokens and accounts, and the 256-bit unsigned integer used for all
//! amounts.
//!
//! ## Integration Points
//!
//! - **Consumed by**: `basin-amm` (pricing math), `basin-dex` (exchange,
//!   registry, ledgers)
//! - **Precision**: amounts are 18-decimal fixed-point base units carried in
//!   `U256`; no floating point exists anywhere downstream
//! - **Identity**: tokens and accounts share one address format; the zero
//!   address is reserved and rejected wherever a concrete identity is
//!   required

pub mod address;
pub mod amount;

pub use address::{Address, AddressParseError, ADDRESS_LEN};
pub use amount::{wei, U256};

/// Identity of a fungible token ledger.
pub type TokenAddress = Address;

/// Identity of a balance-holding account (user or pool).
pub type AccountAddress = Address;
