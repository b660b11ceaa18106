//! Asset ledger and base-currency bank.
//!
//! The engine consumes both as opaque capabilities: a multi-token
//! [`AssetLedger`] with allowance-gated `transfer_from`, and a [`BaseLedger`]
//! holding the native base-currency balances. Bundled here are DashMap-backed
//! in-memory implementations used as the default wiring and by every test;
//! a transaction-executing host could substitute its own.
//!
//! The exchange never grants allowances on the caller's behalf; callers
//! approve the pool account out-of-band before adding liquidity or swapping
//! tokens in.

use crate::error::DexError;
use basin_types::{AccountAddress, TokenAddress, U256};
use dashmap::DashMap;

/// Per-token balance map with transfer/approve/transfer-from semantics.
pub trait AssetLedger: Send + Sync {
    /// Current balance of `account` for `token`.
    fn balance_of(&self, token: TokenAddress, account: AccountAddress) -> U256;

    /// Move `amount` of `token` from `from` to `to`.
    fn transfer(
        &self,
        token: TokenAddress,
        from: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError>;

    /// Move `amount` of `token` from `owner` to `to`, spending the allowance
    /// `owner` previously granted to `spender`.
    fn transfer_from(
        &self,
        token: TokenAddress,
        owner: AccountAddress,
        spender: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError>;
}

/// Native base-currency balances and settlement.
pub trait BaseLedger: Send + Sync {
    fn balance_of(&self, account: AccountAddress) -> U256;

    fn transfer(
        &self,
        from: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError>;
}

/// In-memory multi-token ledger.
#[derive(Debug, Default)]
pub struct InMemoryAssetLedger {
    balances: DashMap<(TokenAddress, AccountAddress), U256>,
    allowances: DashMap<(TokenAddress, AccountAddress, AccountAddress), U256>,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `to` out of thin air. Test and
    /// bootstrap surface, not part of the `AssetLedger` capability.
    pub fn mint(&self, token: TokenAddress, to: AccountAddress, amount: U256) {
        let mut balance = self.balances.entry((token, to)).or_insert_with(U256::zero);
        *balance = *balance + amount;
    }

    /// Let `spender` move up to `amount` of `owner`'s `token`.
    pub fn approve(
        &self,
        token: TokenAddress,
        owner: AccountAddress,
        spender: AccountAddress,
        amount: U256,
    ) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn allowance(
        &self,
        token: TokenAddress,
        owner: AccountAddress,
        spender: AccountAddress,
    ) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .map(|a| *a)
            .unwrap_or_else(U256::zero)
    }

    fn debit(
        &self,
        token: TokenAddress,
        from: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError> {
        let mut balance = self
            .balances
            .entry((token, from))
            .or_insert_with(U256::zero);
        if *balance < amount {
            return Err(DexError::InsufficientBalance { account: from });
        }
        *balance = *balance - amount;
        Ok(())
    }

    fn credit(&self, token: TokenAddress, to: AccountAddress, amount: U256) {
        let mut balance = self.balances.entry((token, to)).or_insert_with(U256::zero);
        *balance = *balance + amount;
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn balance_of(&self, token: TokenAddress, account: AccountAddress) -> U256 {
        self.balances
            .get(&(token, account))
            .map(|b| *b)
            .unwrap_or_else(U256::zero)
    }

    fn transfer(
        &self,
        token: TokenAddress,
        from: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &self,
        token: TokenAddress,
        owner: AccountAddress,
        spender: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        // Check the balance before spending allowance, so a failed move
        // leaves the allowance untouched.
        if self.balance_of(token, owner) < amount {
            return Err(DexError::InsufficientBalance { account: owner });
        }
        {
            let mut allowance = self
                .allowances
                .entry((token, owner, spender))
                .or_insert_with(U256::zero);
            if *allowance < amount {
                return Err(DexError::InsufficientAllowance { owner, spender });
            }
            *allowance = *allowance - amount;
        }
        self.debit(token, owner, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }
}

/// In-memory base-currency bank.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: DashMap<AccountAddress, U256>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit base currency to `to`. Test and bootstrap surface.
    pub fn deposit(&self, to: AccountAddress, amount: U256) {
        let mut balance = self.balances.entry(to).or_insert_with(U256::zero);
        *balance = *balance + amount;
    }
}

impl BaseLedger for InMemoryBank {
    fn balance_of(&self, account: AccountAddress) -> U256 {
        self.balances
            .get(&account)
            .map(|b| *b)
            .unwrap_or_else(U256::zero)
    }

    fn transfer(
        &self,
        from: AccountAddress,
        to: AccountAddress,
        amount: U256,
    ) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        {
            let mut balance = self.balances.entry(from).or_insert_with(U256::zero);
            if *balance < amount {
                return Err(DexError::InsufficientBalance { account: from });
            }
            *balance = *balance - amount;
        }
        let mut balance = self.balances.entry(to).or_insert_with(U256::zero);
        *balance = *balance + amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basin_types::Address;

    const TKN: TokenAddress = Address::new([1u8; 20]);

    fn acct(n: u64) -> AccountAddress {
        Address::from_low_u64(n)
    }

    #[test]
    fn mint_and_transfer() {
        let ledger = InMemoryAssetLedger::new();
        ledger.mint(TKN, acct(1), U256::from(100));

        ledger.transfer(TKN, acct(1), acct(2), U256::from(40)).unwrap();
        assert_eq!(ledger.balance_of(TKN, acct(1)), U256::from(60));
        assert_eq!(ledger.balance_of(TKN, acct(2)), U256::from(40));
    }

    #[test]
    fn transfer_fails_without_funds() {
        let ledger = InMemoryAssetLedger::new();
        let err = ledger
            .transfer(TKN, acct(1), acct(2), U256::from(1))
            .unwrap_err();
        assert_eq!(err, DexError::InsufficientBalance { account: acct(1) });
        assert_eq!(ledger.balance_of(TKN, acct(2)), U256::zero());
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let ledger = InMemoryAssetLedger::new();
        ledger.mint(TKN, acct(1), U256::from(100));
        ledger.approve(TKN, acct(1), acct(9), U256::from(50));

        ledger
            .transfer_from(TKN, acct(1), acct(9), acct(9), U256::from(30))
            .unwrap();
        assert_eq!(ledger.balance_of(TKN, acct(9)), U256::from(30));
        assert_eq!(ledger.allowance(TKN, acct(1), acct(9)), U256::from(20));

        let err = ledger
            .transfer_from(TKN, acct(1), acct(9), acct(9), U256::from(21))
            .unwrap_err();
        assert_eq!(
            err,
            DexError::InsufficientAllowance {
                owner: acct(1),
                spender: acct(9)
            }
        );
    }

    #[test]
    fn zero_amount_moves_are_noops() {
        let ledger = InMemoryAssetLedger::new();
        ledger
            .transfer(TKN, acct(1), acct(2), U256::zero())
            .unwrap();
        ledger
            .transfer_from(TKN, acct(1), acct(9), acct(2), U256::zero())
            .unwrap();
    }

    #[test]
    fn bank_transfer_and_underflow() {
        let bank = InMemoryBank::new();
        bank.deposit(acct(1), U256::from(10));
        bank.transfer(acct(1), acct(2), U256::from(10)).unwrap();
        assert_eq!(bank.balance_of(acct(1)), U256::zero());
        assert_eq!(bank.balance_of(acct(2)), U256::from(10));

        let err = bank.transfer(acct(1), acct(2), U256::from(1)).unwrap_err();
        assert_eq!(err, DexError::InsufficientBalance { account: acct(1) });
    }
}
