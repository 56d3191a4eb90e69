// collection/tests/invariants.rs

//! Property tests for the supply invariant
//!
//! For any interleaving of the three mint paths, successful or not,
//! `issued + total_reserved <= max_supply` must hold after every call, and
//! a failed call must leave the issued count unchanged.

use collection::{Collection, ReservationLedger, SaleConfig};
use collection_core::{Amount, AssetRegistry, CallContext, InMemoryRegistry, ManualClock};
use collection_crypto::{Account, AllowlistTree};
use proptest::prelude::*;

const ALLOWLIST_PRICE: u64 = 50;
const PUBLIC_PRICE: u64 = 80;
const ACCOUNTS: usize = 6;

/// One attempted mint call, drawn from an arbitrary interleaving
#[derive(Debug, Clone)]
enum MintOp {
    Internal { account: usize, amount: u64 },
    Allowlist { account: usize, pay_exact: bool },
    Public { account: usize, amount: u64, pay_exact: bool },
}

// Quantities include zero and u64::MAX so the admission checks see the
// degenerate requests too
fn quantity() -> impl Strategy<Value = u64> {
    prop_oneof![4 => 0u64..4, 1 => Just(u64::MAX)]
}

fn mint_op() -> impl Strategy<Value = MintOp> {
    prop_oneof![
        (0..ACCOUNTS, quantity())
            .prop_map(|(account, amount)| MintOp::Internal { account, amount }),
        (0..ACCOUNTS, any::<bool>())
            .prop_map(|(account, pay_exact)| MintOp::Allowlist { account, pay_exact }),
        (0..ACCOUNTS, quantity(), any::<bool>())
            .prop_map(|(account, amount, pay_exact)| MintOp::Public { account, amount, pay_exact }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn supply_invariant_holds_for_any_mint_interleaving(
        ops in proptest::collection::vec(mint_op(), 1..40),
        max_supply in 1u64..16,
        reserve in 0u64..6,
    ) {
        let accounts: Vec<Account> = (0..ACCOUNTS as u8)
            .map(|i| {
                let mut bytes = [0u8; 20];
                bytes[19] = i + 1;
                Account::new(bytes)
            })
            .collect();
        // First half of the accounts are allow-listed, first two hold reserves
        let tree = AllowlistTree::new(&accounts[..ACCOUNTS / 2]).unwrap();
        let reserve = reserve.min(max_supply);
        let grants = [(accounts[0], reserve / 2), (accounts[1], reserve - reserve / 2)];

        let admin = Account::random();
        let admin_ctx = CallContext::direct(admin, Amount::zero());
        let config = SaleConfig {
            allowlist_price: Amount::from_u64(ALLOWLIST_PRICE),
            public_price: Amount::from_u64(PUBLIC_PRICE),
            allowlist_claim_cap: 2,
            max_supply,
            ..SaleConfig::default()
        };
        let mut collection = Collection::new(
            admin,
            Account::random(),
            config,
            ReservationLedger::new(&grants),
            InMemoryRegistry::new(),
            Box::new(ManualClock::new(1_000)),
        ).unwrap();
        collection.set_allowlist_active(&admin_ctx, true).unwrap();
        collection.set_public_active(&admin_ctx, true).unwrap();
        collection.set_allowlist_root(&admin_ctx, tree.root()).unwrap();

        for op in ops {
            let issued_before = collection.registry().total_issued();
            let reserved_before = collection.sale().reservations().total_reserved();

            let outcome = match op {
                MintOp::Internal { account, amount } => {
                    let ctx = CallContext::direct(accounts[account], Amount::zero());
                    collection.internal_mint(&ctx, amount).map(|ids| ids.len() as u64)
                }
                MintOp::Allowlist { account, pay_exact } => {
                    let payment = if pay_exact { ALLOWLIST_PRICE } else { ALLOWLIST_PRICE + 1 };
                    let ctx = CallContext::direct(accounts[account], Amount::from_u64(payment));
                    let proof = tree
                        .proof_for(&accounts[account])
                        .unwrap_or_else(|| tree.proof_for(&accounts[0]).unwrap());
                    collection.allowlist_mint(&ctx, &proof, 1).map(|ids| ids.len() as u64)
                }
                MintOp::Public { account, amount, pay_exact } => {
                    let exact = Amount::from_u64(PUBLIC_PRICE).times(amount);
                    let payment = if pay_exact {
                        exact
                    } else {
                        exact.checked_add(&Amount::from_u64(7)).unwrap()
                    };
                    let ctx = CallContext::direct(accounts[account], payment);
                    collection.public_mint(&ctx, amount).map(|ids| ids.len() as u64)
                }
            };

            let issued = collection.registry().total_issued();
            let reserved = collection.sale().reservations().total_reserved();

            prop_assert!(issued + reserved <= max_supply,
                "invariant broken: {} issued + {} reserved > {}", issued, reserved, max_supply);
            prop_assert!(reserved <= reserved_before, "reservations may only shrink");

            match outcome {
                Ok(minted) => prop_assert_eq!(issued, issued_before + minted),
                Err(_) => {
                    // A rejected call commits nothing
                    prop_assert_eq!(issued, issued_before);
                    prop_assert_eq!(reserved, reserved_before);
                }
            }
        }
    }
}
