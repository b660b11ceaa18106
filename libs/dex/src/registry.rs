//! Pool registry ("factory"): creates and indexes one exchange per token.
//!
//! The registry holds the ledger and bank capabilities plus the default fee
//! ratio, and injects all three into every exchange it creates, so no pool
//! reaches for ambient global state. Mappings are create-once: a token's
//! pool is never replaced or removed for the registry's lifetime, and
//! repeated creation for the same token fails rather than returning the
//! existing pool.

use crate::error::DexError;
use crate::exchange::Exchange;
use crate::ledger::{AssetLedger, BaseLedger};
use basin_amm::SwapFee;
use basin_types::{AccountAddress, TokenAddress};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use std::sync::Arc;
use tracing::info;

/// Shared handle to a registered exchange.
pub type PoolHandle = Arc<RwLock<Exchange>>;

/// Registry of all pools, keyed by the token they pair against the base
/// currency.
pub struct PoolRegistry {
    pools: DashMap<TokenAddress, PoolHandle>,
    ledger: Arc<dyn AssetLedger>,
    bank: Arc<dyn BaseLedger>,
    fee: SwapFee,
}

impl PoolRegistry {
    pub fn new(ledger: Arc<dyn AssetLedger>, bank: Arc<dyn BaseLedger>, fee: SwapFee) -> Self {
        PoolRegistry {
            pools: DashMap::new(),
            ledger,
            bank,
            fee,
        }
    }

    /// Instantiate a new exchange bound to `token` and record the mapping.
    ///
    /// Fails with `InvalidTokenAddress` for the zero address and with
    /// `PoolAlreadyExists` if the token already has a pool.
    pub fn create_exchange(&self, token: TokenAddress) -> Result<PoolHandle, DexError> {
        if token.is_zero() {
            return Err(DexError::InvalidTokenAddress);
        }
        match self.pools.entry(token) {
            Entry::Occupied(_) => Err(DexError::PoolAlreadyExists(token)),
            Entry::Vacant(slot) => {
                let address = pool_account(token);
                let exchange = Exchange::new(
                    token,
                    address,
                    self.fee,
                    self.ledger.clone(),
                    self.bank.clone(),
                )?;
                let handle = Arc::new(RwLock::new(exchange));
                slot.insert(handle.clone());
                info!(token = %token, pool = %address, "exchange created");
                Ok(handle)
            }
        }
    }

    /// Look up the exchange for `token`. Absent is `None`, never an error.
    pub fn get_exchange(&self, token: TokenAddress) -> Option<PoolHandle> {
        self.pools.get(&token).map(|entry| entry.value().clone())
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Deterministic pool account derived from the paired token, so a pool's
/// ledger identity is reproducible without any deployment machinery.
pub fn pool_account(token: TokenAddress) -> AccountAddress {
    let mut hasher = Keccak256::new();
    hasher.update(b"basin/pool/v1");
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[12..32]);
    AccountAddress::new(bytes)
}
