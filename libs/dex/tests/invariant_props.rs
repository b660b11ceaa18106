//! Exchange Invariant Property Tests
//!
//! Drives a seeded pool through arbitrary swap sequences and checks the
//! properties that must hold regardless of trade direction or size: the
//! reserve product never decreases across swaps, and the cached reserves
//! always equal the actual ledger balances.

use basin_amm::SwapFee;
use basin_dex::{Exchange, InMemoryAssetLedger, InMemoryBank};
use basin_types::{Address, TokenAddress, U256};
use proptest::prelude::*;
use std::sync::Arc;

const TKN: TokenAddress = Address::new([0x11; 20]);
const POOL: Address = Address::new([0xaa; 20]);
const LP: Address = Address::new([0x01; 20]);
const TRADER: Address = Address::new([0x02; 20]);

#[derive(Debug, Clone, Copy)]
enum SwapOp {
    BaseIn(u64),
    TokenIn(u64),
}

fn swap_op() -> impl Strategy<Value = SwapOp> {
    prop_oneof![
        (1u64..100_000).prop_map(SwapOp::BaseIn),
        (1u64..100_000).prop_map(SwapOp::TokenIn),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn swaps_never_shrink_the_reserve_product(
        seed_token in 1_000_000u64..1_000_000_000,
        seed_base in 1_000_000u64..1_000_000_000,
        ops in prop::collection::vec(swap_op(), 1..20),
    ) {
        let ledger = Arc::new(InMemoryAssetLedger::new());
        let bank = Arc::new(InMemoryBank::new());
        let mut pool = Exchange::new(
            TKN,
            POOL,
            SwapFee::default(),
            ledger.clone(),
            bank.clone(),
        )
        .unwrap();

        ledger.mint(TKN, LP, U256::from(seed_token));
        ledger.approve(TKN, LP, POOL, U256::from(seed_token));
        bank.deposit(LP, U256::from(seed_base));
        pool.add_liquidity(LP, U256::from(seed_token), U256::from(seed_base)).unwrap();

        // Fund the trader generously so only pool math decides outcomes.
        let war_chest = U256::from(u64::MAX);
        ledger.mint(TKN, TRADER, war_chest);
        ledger.approve(TKN, TRADER, POOL, war_chest);
        bank.deposit(TRADER, war_chest);

        for op in ops {
            let k_before = pool.token_reserve() * pool.base_reserve();
            match op {
                SwapOp::BaseIn(amount) => {
                    pool.swap_base_for_token(TRADER, U256::from(amount), U256::zero()).unwrap();
                }
                SwapOp::TokenIn(amount) => {
                    pool.swap_token_for_base(TRADER, U256::from(amount), U256::zero()).unwrap();
                }
            }
            let k_after = pool.token_reserve() * pool.base_reserve();
            prop_assert!(k_after >= k_before);
            pool.verify_reserves().unwrap();
        }
    }

    #[test]
    fn redemption_never_pays_more_than_pro_rata(
        seed_token in 1_000u64..1_000_000,
        seed_base in 1_000u64..1_000_000,
        shares in 1u64..1_000,
    ) {
        let ledger = Arc::new(InMemoryAssetLedger::new());
        let bank = Arc::new(InMemoryBank::new());
        let mut pool = Exchange::new(
            TKN,
            POOL,
            SwapFee::default(),
            ledger.clone(),
            bank.clone(),
        )
        .unwrap();

        ledger.mint(TKN, LP, U256::from(seed_token));
        ledger.approve(TKN, LP, POOL, U256::from(seed_token));
        bank.deposit(LP, U256::from(seed_base));
        pool.add_liquidity(LP, U256::from(seed_token), U256::from(seed_base)).unwrap();

        let shares = U256::from(shares).min(pool.lp_supply());
        let supply_before = pool.lp_supply();
        let (base_out, token_out) = pool.remove_liquidity(LP, shares).unwrap();

        // Floor division can only round down, never up.
        prop_assert!(base_out * supply_before <= U256::from(seed_base) * shares);
        prop_assert!(token_out * supply_before <= U256::from(seed_token) * shares);
        pool.verify_reserves().unwrap();
    }
}
