//! Exchange: one pool pairing the base currency with a single token.
//!
//! The exchange owns reserve accounting, LP-share issuance, and swap
//! execution. All pricing delegates to `basin-amm`; this module's job is to
//! sequence asset movement so that every failure is total.
//!
//! Reserves are cached explicitly and updated transactionally alongside each
//! transfer rather than re-read from the ledgers, which rules out the
//! reentrancy-style desync the balance-derived design is prone to. After
//! every mutating operation the cache is verified against the actual ledger
//! and bank balances; a mismatch is a [`DexError::ReserveDesync`] and means
//! a bug, not a recoverable condition.
//!
//! Operations are strictly serialized per pool: callers hold the pool's
//! write lock for the whole operation, so no step here has a suspension
//! point and no partially-applied state is ever observable. Routed trades
//! touch two pools at once; [`crate::router`] takes both write locks in
//! canonical token order before calling in here.

use crate::error::DexError;
use crate::ledger::{AssetLedger, BaseLedger};
use basin_amm::{output_amount, AmmError, SwapFee};
use basin_types::{AccountAddress, TokenAddress, U256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A single base-currency/token pool.
pub struct Exchange {
    token: TokenAddress,
    address: AccountAddress,
    fee: SwapFee,
    ledger: Arc<dyn AssetLedger>,
    bank: Arc<dyn BaseLedger>,

    // Cached reserves, kept in lockstep with every transfer.
    token_reserve: U256,
    base_reserve: U256,

    // LP share accounting. The sum of all balances equals `lp_supply`.
    lp_supply: U256,
    lp_balances: HashMap<AccountAddress, U256>,
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("token", &self.token)
            .field("address", &self.address)
            .field("token_reserve", &self.token_reserve)
            .field("base_reserve", &self.base_reserve)
            .field("lp_supply", &self.lp_supply)
            .finish()
    }
}

impl Exchange {
    /// Create an empty pool bound to `token`, holding assets under the
    /// `address` account on the injected ledgers.
    pub fn new(
        token: TokenAddress,
        address: AccountAddress,
        fee: SwapFee,
        ledger: Arc<dyn AssetLedger>,
        bank: Arc<dyn BaseLedger>,
    ) -> Result<Self, DexError> {
        if token.is_zero() || address.is_zero() {
            return Err(DexError::InvalidTokenAddress);
        }
        Ok(Exchange {
            token,
            address,
            fee,
            ledger,
            bank,
            token_reserve: U256::zero(),
            base_reserve: U256::zero(),
            lp_supply: U256::zero(),
            lp_balances: HashMap::new(),
        })
    }

    pub fn token(&self) -> TokenAddress {
        self.token
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn fee(&self) -> SwapFee {
        self.fee
    }

    /// Current token reserve.
    pub fn token_reserve(&self) -> U256 {
        self.token_reserve
    }

    /// Current base-currency reserve.
    pub fn base_reserve(&self) -> U256 {
        self.base_reserve
    }

    /// Total outstanding LP shares.
    pub fn lp_supply(&self) -> U256 {
        self.lp_supply
    }

    /// LP shares held by `account`.
    pub fn lp_balance_of(&self, account: AccountAddress) -> U256 {
        self.lp_balances
            .get(&account)
            .copied()
            .unwrap_or_else(U256::zero)
    }

    /// Quote tokens received for a base-currency input. Pure read.
    pub fn quote_token_out(&self, base_in: U256) -> Result<U256, DexError> {
        Ok(output_amount(
            base_in,
            self.base_reserve,
            self.token_reserve,
            self.fee,
        )?)
    }

    /// Quote base currency received for a token input. Pure read.
    pub fn quote_base_out(&self, token_in: U256) -> Result<U256, DexError> {
        Ok(output_amount(
            token_in,
            self.token_reserve,
            self.base_reserve,
            self.fee,
        )?)
    }

    /// Add liquidity at the current price ratio.
    ///
    /// `base_in` is the base-currency value accompanying the call; it is
    /// debited from `caller`'s bank balance. On an empty pool the supplied
    /// amounts seed the reserves directly and `base_in` shares are minted
    /// (zero amounts are permitted and mint nothing). Seeding tokens with
    /// zero value deposits them with no share claim against them; only a
    /// later deposit that carries value starts share issuance. On a seeded
    /// pool only
    /// the proportionally required token amount is pulled from the caller's
    /// allowance; offering less fails with `InsufficientTokenAmount`.
    pub fn add_liquidity(
        &mut self,
        caller: AccountAddress,
        token_amount: U256,
        base_in: U256,
    ) -> Result<U256, DexError> {
        // The accompanying value must be fundable before any asset moves,
        // so a late debit failure cannot strand a half-applied deposit.
        if self.bank.balance_of(caller) < base_in {
            return Err(DexError::InsufficientBalance { account: caller });
        }

        let minted = if self.lp_supply.is_zero() {
            // Bootstrap: base-currency units define the initial share unit.
            self.pull_token(caller, token_amount)?;
            self.accept_base(caller, base_in)?;
            self.mint_shares(caller, base_in);
            base_in
        } else {
            let required = base_in
                .checked_mul(self.token_reserve)
                .ok_or(AmmError::Overflow)?
                / self.base_reserve;
            if token_amount < required {
                return Err(DexError::InsufficientTokenAmount {
                    required,
                    offered: token_amount,
                });
            }
            // Shares are priced against the reserves before this deposit.
            let minted = self
                .lp_supply
                .checked_mul(base_in)
                .ok_or(AmmError::Overflow)?
                / self.base_reserve;
            self.pull_token(caller, required)?;
            self.accept_base(caller, base_in)?;
            self.mint_shares(caller, minted);
            minted
        };

        self.verify_reserves()?;
        info!(
            pool = %self.address,
            caller = %caller,
            minted = %minted,
            lp_supply = %self.lp_supply,
            "liquidity added"
        );
        Ok(minted)
    }

    /// Redeem `shares` for a pro-rata slice of both reserves.
    ///
    /// Payouts are computed against the reserves before the burn, with floor
    /// division; burning the entire supply drains the pool to exactly zero.
    pub fn remove_liquidity(
        &mut self,
        caller: AccountAddress,
        shares: U256,
    ) -> Result<(U256, U256), DexError> {
        let held = self.lp_balance_of(caller);
        if shares > held {
            return Err(DexError::InsufficientShareBalance {
                requested: shares,
                held,
            });
        }
        if shares.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }

        let base_out = self
            .base_reserve
            .checked_mul(shares)
            .ok_or(AmmError::Overflow)?
            / self.lp_supply;
        let token_out = self
            .token_reserve
            .checked_mul(shares)
            .ok_or(AmmError::Overflow)?
            / self.lp_supply;

        // Burn before paying out; both payouts draw on reserves the burn
        // has already released, so neither can fail with sound accounting.
        self.burn_shares(caller, shares);
        self.pay_base(caller, base_out)?;
        self.pay_token(caller, token_out)?;

        self.verify_reserves()?;
        info!(
            pool = %self.address,
            caller = %caller,
            burned = %shares,
            base_out = %base_out,
            token_out = %token_out,
            "liquidity removed"
        );
        Ok((base_out, token_out))
    }

    /// Swap base currency for tokens, paying the caller.
    pub fn swap_base_for_token(
        &mut self,
        caller: AccountAddress,
        base_in: U256,
        min_token_out: U256,
    ) -> Result<U256, DexError> {
        self.swap_base_for_token_to(caller, caller, base_in, min_token_out)
    }

    /// Swap base currency for tokens, paying an explicit recipient.
    pub fn swap_base_for_token_to(
        &mut self,
        caller: AccountAddress,
        recipient: AccountAddress,
        base_in: U256,
        min_token_out: U256,
    ) -> Result<U256, DexError> {
        // Reserves are read before the incoming value is credited.
        let token_out = output_amount(base_in, self.base_reserve, self.token_reserve, self.fee)?;
        if token_out < min_token_out {
            return Err(DexError::InsufficientOutputAmount {
                minimum: min_token_out,
                actual: token_out,
            });
        }

        self.accept_base(caller, base_in)?;
        self.pay_token(recipient, token_out)?;

        self.verify_reserves()?;
        debug!(
            pool = %self.address,
            caller = %caller,
            recipient = %recipient,
            base_in = %base_in,
            token_out = %token_out,
            "base swapped for token"
        );
        Ok(token_out)
    }

    /// Swap tokens for base currency.
    pub fn swap_token_for_base(
        &mut self,
        caller: AccountAddress,
        token_in: U256,
        min_base_out: U256,
    ) -> Result<U256, DexError> {
        let base_out = output_amount(token_in, self.token_reserve, self.base_reserve, self.fee)?;
        if base_out < min_base_out {
            return Err(DexError::InsufficientOutputAmount {
                minimum: min_base_out,
                actual: base_out,
            });
        }

        self.pull_token(caller, token_in)?;
        self.pay_base(caller, base_out)?;

        self.verify_reserves()?;
        debug!(
            pool = %self.address,
            caller = %caller,
            token_in = %token_in,
            base_out = %base_out,
            "token swapped for base"
        );
        Ok(base_out)
    }

    /// Swap this pool's token for `dest`'s token, routing through the base
    /// currency.
    ///
    /// The caller must already hold both pool locks; `crate::router`
    /// acquires them in canonical token order so opposite-direction routes
    /// from different threads cannot wait on each other's second lock.
    /// Both legs are quoted and the final minimum checked before any asset
    /// moves, so a second-leg failure cannot strand a half-executed trade.
    /// The intermediate base amount moves pool-to-pool through the bank and
    /// the destination token is paid directly to the caller. No minimum is
    /// enforced on the intermediate leg.
    pub fn swap_token_for_token(
        &mut self,
        dest: &mut Exchange,
        caller: AccountAddress,
        token_in: U256,
        min_other_out: U256,
    ) -> Result<U256, DexError> {
        // A pool cannot route to itself.
        if dest.token == self.token {
            return Err(DexError::UnknownPool(dest.token));
        }

        let base_mid = output_amount(token_in, self.token_reserve, self.base_reserve, self.fee)?;
        let other_out = output_amount(
            base_mid,
            dest.base_reserve,
            dest.token_reserve,
            dest.fee,
        )?;
        if other_out < min_other_out {
            return Err(DexError::InsufficientOutputAmount {
                minimum: min_other_out,
                actual: other_out,
            });
        }

        self.pull_token(caller, token_in)?;
        self.bank.transfer(self.address, dest.address, base_mid)?;
        self.base_reserve = self.base_reserve - base_mid;
        dest.base_reserve = dest.base_reserve + base_mid;
        dest.pay_token(caller, other_out)?;

        self.verify_reserves()?;
        dest.verify_reserves()?;
        info!(
            source = %self.address,
            dest = %dest.address,
            caller = %caller,
            token_in = %token_in,
            base_mid = %base_mid,
            other_out = %other_out,
            "token swapped for token"
        );
        Ok(other_out)
    }

    /// Verify the cached reserves against the actual ledger balances.
    /// Exposed so hosts and tests can audit the coupling at any point.
    pub fn verify_reserves(&self) -> Result<(), DexError> {
        let token_held = self.ledger.balance_of(self.token, self.address);
        let base_held = self.bank.balance_of(self.address);
        if token_held != self.token_reserve || base_held != self.base_reserve {
            return Err(DexError::ReserveDesync { pool: self.address });
        }
        Ok(())
    }

    fn pull_token(&mut self, from: AccountAddress, amount: U256) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger
            .transfer_from(self.token, from, self.address, self.address, amount)?;
        self.token_reserve = self.token_reserve + amount;
        Ok(())
    }

    fn pay_token(&mut self, to: AccountAddress, amount: U256) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger.transfer(self.token, self.address, to, amount)?;
        self.token_reserve = self.token_reserve - amount;
        Ok(())
    }

    fn accept_base(&mut self, from: AccountAddress, amount: U256) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.bank.transfer(from, self.address, amount)?;
        self.base_reserve = self.base_reserve + amount;
        Ok(())
    }

    fn pay_base(&mut self, to: AccountAddress, amount: U256) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.bank.transfer(self.address, to, amount)?;
        self.base_reserve = self.base_reserve - amount;
        Ok(())
    }

    fn mint_shares(&mut self, to: AccountAddress, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let balance = self.lp_balances.entry(to).or_insert_with(U256::zero);
        *balance = *balance + amount;
        self.lp_supply = self.lp_supply + amount;
    }

    fn burn_shares(&mut self, from: AccountAddress, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let remaining = self.lp_balance_of(from) - amount;
        if remaining.is_zero() {
            self.lp_balances.remove(&from);
        } else {
            self.lp_balances.insert(from, remaining);
        }
        self.lp_supply = self.lp_supply - amount;
    }
}
