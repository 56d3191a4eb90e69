// collection/tests/integration.rs

//! End-to-end lifecycle tests against the in-memory registry

use collection::{
    Collection, CollectionError, PayoutScheme, ReservationLedger, SaleConfig,
};
use collection_core::{Amount, AssetRegistry, CallContext, InMemoryRegistry, ManualClock};
use collection_crypto::{Account, AllowlistTree};
use std::sync::Arc;

const ALLOWLIST_PRICE: u64 = 50;
const PUBLIC_PRICE: u64 = 80;

struct Fixture {
    collection: Collection<InMemoryRegistry>,
    clock: Arc<ManualClock>,
    admin: Account,
    custodian: Account,
}

impl Fixture {
    fn new(max_supply: u64, grants: &[(Account, u64)]) -> Self {
        init_tracing();
        let admin = Account::random();
        let custodian = Account::random();
        let clock = Arc::new(ManualClock::new(1_000_000));
        let config = SaleConfig {
            allowlist_price: Amount::from_u64(ALLOWLIST_PRICE),
            public_price: Amount::from_u64(PUBLIC_PRICE),
            max_supply,
            ..SaleConfig::default()
        };
        let collection = Collection::new(
            admin,
            custodian,
            config,
            ReservationLedger::new(grants),
            InMemoryRegistry::new(),
            Box::new(clock.clone()),
        )
        .unwrap();
        Self { collection, clock, admin, custodian }
    }

    fn admin_ctx(&self) -> CallContext {
        CallContext::direct(self.admin, Amount::zero())
    }

    fn public_mint_one(&mut self, minter: Account) -> u64 {
        let ctx = CallContext::direct(minter, Amount::from_u64(PUBLIC_PRICE));
        self.collection.public_mint(&ctx, 1).unwrap()[0]
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn free_ctx(account: Account) -> CallContext {
    CallContext::direct(account, Amount::zero())
}

#[test]
fn supply_ceiling_holds_across_public_mints() {
    // Ceiling 4 with 1 reserved: three public mints fit, the fourth does not
    let team = Account::random();
    let mut fx = Fixture::new(4, &[(team, 1)]);
    fx.collection.set_public_active(&fx.admin_ctx(), true).unwrap();

    for _ in 0..3 {
        fx.public_mint_one(Account::random());
    }
    assert_eq!(fx.collection.registry().total_issued(), 3);

    let late = CallContext::direct(Account::random(), Amount::from_u64(PUBLIC_PRICE));
    assert_eq!(
        fx.collection.public_mint(&late, 1),
        Err(CollectionError::SupplyExceeded)
    );
    assert_eq!(fx.collection.registry().total_issued(), 3);

    // The reserved slot is still mintable by its holder
    assert_eq!(fx.collection.internal_mint(&free_ctx(team), 1).unwrap(), vec![3]);
    assert_eq!(fx.collection.registry().total_issued(), 4);
}

#[test]
fn oversized_mint_request_fails_as_supply_rejection() {
    let member = Account::random();
    let tree = AllowlistTree::new(&[member]).unwrap();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_allowlist_root(&admin, tree.root()).unwrap();
    fx.collection.set_allowlist_active(&admin, true).unwrap();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.public_mint_one(Account::random());

    // A quantity large enough to wrap the issued counter is an ordinary
    // supply rejection, nothing is issued
    let proof = tree.proof_for(&member).unwrap();
    let ctx = CallContext::direct(member, Amount::from_u64(ALLOWLIST_PRICE));
    assert_eq!(
        fx.collection.allowlist_mint(&ctx, &proof, u64::MAX),
        Err(CollectionError::SupplyExceeded)
    );
    assert_eq!(fx.collection.registry().total_issued(), 1);
}

#[test]
fn outsider_cannot_use_someone_elses_proof() {
    let members: Vec<Account> = (0..4).map(|_| Account::random()).collect();
    let tree = AllowlistTree::new(&members).unwrap();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_allowlist_root(&admin, tree.root()).unwrap();
    fx.collection.set_allowlist_active(&admin, true).unwrap();

    let outsider = Account::random();
    let stolen = tree.proof_for(&members[0]).unwrap();
    let ctx = CallContext::direct(outsider, Amount::from_u64(ALLOWLIST_PRICE));
    assert_eq!(
        fx.collection.allowlist_mint(&ctx, &stolen, 1),
        Err(CollectionError::ProofInvalid)
    );
    assert!(!fx.collection.is_on_allowlist(&stolen, &outsider));

    // The legitimate member mints at the allow-list price
    let member_ctx = CallContext::direct(members[0], Amount::from_u64(ALLOWLIST_PRICE));
    let proof = tree.proof_for(&members[0]).unwrap();
    let ids = fx.collection.allowlist_mint(&member_ctx, &proof, 1).unwrap();
    assert_eq!(
        fx.collection.token(ids[0]).unwrap().price_paid,
        Amount::from_u64(ALLOWLIST_PRICE)
    );
}

#[test]
fn refund_moves_token_to_custodian_and_repays_net_of_fee() {
    let minter = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    fx.collection.set_refund_active(&admin, true).unwrap();

    let ctx = free_ctx(minter);
    let repayment = fx.collection.refund(&ctx, minter, id).unwrap();

    // Default fee is 20%: 80 paid, 64 repaid
    assert_eq!(repayment, Amount::from_u64(64));
    assert_eq!(fx.collection.registry().owner_of(id).unwrap(), fx.custodian);
    assert!(fx.collection.token(id).unwrap().refunded);
    assert_eq!(*fx.collection.balance(), Amount::from_u64(16));

    // A second attempt fails and changes nothing
    assert_eq!(
        fx.collection.refund(&ctx, minter, id),
        Err(CollectionError::NotTokenOwner(id))
    );
}

#[test]
fn refunded_flag_flips_exactly_once() {
    // Custodian hands the token back, then the original owner retries
    let minter = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    fx.collection.set_refund_active(&admin, true).unwrap();
    fx.collection.refund(&free_ctx(minter), minter, id).unwrap();

    fx.collection.set_transfers_disabled(&admin, false).unwrap();
    let custodian_ctx = free_ctx(fx.custodian);
    fx.collection.transfer(&custodian_ctx, minter, id).unwrap();

    assert_eq!(
        fx.collection.refund(&free_ctx(minter), minter, id),
        Err(CollectionError::AlreadyRefunded(id))
    );
}

#[test]
fn free_mints_are_never_refundable() {
    let team = Account::random();
    let mut fx = Fixture::new(10, &[(team, 1)]);
    let admin = fx.admin_ctx();
    let id = fx.collection.internal_mint(&free_ctx(team), 1).unwrap()[0];

    fx.collection.set_refund_active(&admin, true).unwrap();
    assert_eq!(
        fx.collection.refund(&free_ctx(team), team, id),
        Err(CollectionError::FreeMintNotRefundable)
    );
}

#[test]
fn transfers_are_disabled_until_explicitly_enabled() {
    let minter = Account::random();
    let dest = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    let ctx = free_ctx(minter);
    assert_eq!(
        fx.collection.transfer(&ctx, dest, id),
        Err(CollectionError::TransfersDisabled)
    );

    fx.collection.set_transfers_disabled(&admin, false).unwrap();
    fx.collection.transfer(&ctx, dest, id).unwrap();
    assert_eq!(fx.collection.registry().owner_of(id).unwrap(), dest);
}

#[test]
fn one_token_per_account_cap_on_transfers() {
    let (a, b) = (Account::random(), Account::random());
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_transfers_disabled(&admin, false).unwrap();

    let first = fx.public_mint_one(a);
    let _second = fx.public_mint_one(b);

    // b already holds a token, so a's transfer to b is rejected
    assert_eq!(
        fx.collection.transfer(&free_ctx(a), b, first),
        Err(CollectionError::OnlyOneTokenPerAccount)
    );

    // The custodian is exempt from the cap
    fx.collection.transfer(&free_ctx(a), fx.custodian, first).unwrap();
    let third = fx.public_mint_one(a);
    fx.collection.transfer(&free_ctx(a), fx.custodian, third).unwrap();
    assert_eq!(fx.collection.registry().balance_of(&fx.custodian), 2);
}

#[test]
fn staking_cycle_accounts_elapsed_time() {
    let minter = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    let ctx = free_ctx(minter);
    assert_eq!(
        fx.collection.toggle_staking(&ctx, id),
        Err(CollectionError::StakingClosed)
    );

    fx.collection.set_staking_open(&admin, true).unwrap();
    assert_eq!(fx.collection.toggle_staking(&ctx, id), Ok(true));

    fx.clock.advance(3_600);
    let status = fx.collection.staking_period(id).unwrap();
    assert!(status.staked);
    assert_eq!(status.current_period, 3_600);
    assert_eq!(status.total_period, 0);

    assert_eq!(fx.collection.toggle_staking(&ctx, id), Ok(false));
    let status = fx.collection.staking_period(id).unwrap();
    assert!(!status.staked);
    assert_eq!(status.current_period, 0);
    assert_eq!(status.total_period, 3_600);
}

#[test]
fn staked_token_blocks_ordinary_transfer_but_not_exempt_path() {
    let minter = Account::random();
    let dest = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_transfers_disabled(&admin, false).unwrap();
    fx.collection.set_staking_open(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    let ctx = free_ctx(minter);
    fx.collection.toggle_staking(&ctx, id).unwrap();
    fx.clock.advance(100);

    assert_eq!(
        fx.collection.transfer(&ctx, dest, id),
        Err(CollectionError::StakingActive(id))
    );

    // The owner's exempt path moves the token without unstaking
    fx.collection.staking_exempt_transfer(&ctx, dest, id).unwrap();
    assert_eq!(fx.collection.registry().owner_of(id).unwrap(), dest);

    // The stake survived the move and keeps accruing
    fx.clock.advance(100);
    let status = fx.collection.staking_period(id).unwrap();
    assert!(status.staked);
    assert_eq!(status.current_period, 200);

    // The new owner unstakes and collects the full duration
    let dest_ctx = free_ctx(dest);
    assert_eq!(fx.collection.toggle_staking(&dest_ctx, id), Ok(false));
    assert_eq!(fx.collection.staking_period(id).unwrap().total_period, 200);
}

#[test]
fn exempt_transfer_is_owner_only_and_respects_kill_switch() {
    let minter = Account::random();
    let dest = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_staking_open(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);
    fx.collection.toggle_staking(&free_ctx(minter), id).unwrap();

    // Not the owner
    assert_eq!(
        fx.collection.staking_exempt_transfer(&free_ctx(dest), dest, id),
        Err(CollectionError::NotTokenOwner(id))
    );

    // The exemption bypasses the staking lock only, not the kill-switch
    assert_eq!(
        fx.collection.staking_exempt_transfer(&free_ctx(minter), dest, id),
        Err(CollectionError::TransfersDisabled)
    );
}

#[test]
fn batch_toggle_allows_partial_success() {
    let minter = Account::random();
    let other = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_staking_open(&admin, true).unwrap();

    let mine = fx.public_mint_one(minter);
    let theirs = fx.public_mint_one(other);

    let results = fx
        .collection
        .toggle_staking_batch(&free_ctx(minter), &[mine, theirs, 42]);

    assert_eq!(results[0], (mine, Ok(true)));
    assert_eq!(results[1], (theirs, Err(CollectionError::NotApprovedOrOwner(theirs))));
    assert_eq!(results[2], (42, Err(CollectionError::NonexistentToken(42))));

    // The failing entries did not gate the first one
    assert!(fx.collection.staking_period(mine).unwrap().staked);
}

#[test]
fn approved_operator_can_toggle_and_transfer() {
    let minter = Account::random();
    let operator = Account::random();
    let dest = Account::random();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_transfers_disabled(&admin, false).unwrap();
    fx.collection.set_staking_open(&admin, true).unwrap();
    let id = fx.public_mint_one(minter);

    fx.collection.approve(&free_ctx(minter), operator, id).unwrap();

    let op_ctx = free_ctx(operator);
    assert_eq!(fx.collection.toggle_staking(&op_ctx, id), Ok(true));
    assert_eq!(fx.collection.toggle_staking(&op_ctx, id), Ok(false));

    fx.collection.transfer(&op_ctx, dest, id).unwrap();
    assert_eq!(fx.collection.registry().owner_of(id).unwrap(), dest);
}

#[test]
fn reveal_shuffle_remaps_every_token() {
    let mut fx = Fixture::new(20, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_public_active(&admin, true).unwrap();
    fx.collection.set_base_uri(&admin, "ipfs://drop/".into()).unwrap();
    fx.collection
        .set_unrevealed_uri(&admin, "ipfs://hidden.json".into())
        .unwrap();

    for _ in 0..8 {
        fx.public_mint_one(Account::random());
    }

    // Before reveal every token shares the placeholder
    assert_eq!(fx.collection.token_uri(0).unwrap(), "ipfs://hidden.json");
    assert_eq!(
        fx.collection.token_uri(9),
        Err(CollectionError::NonexistentToken(9))
    );

    fx.collection.set_reveal(&admin, true).unwrap();
    assert_eq!(fx.collection.token_uri(3).unwrap(), "ipfs://drop/3.json");

    fx.collection.shuffle_reveal(&admin, b"oracle-seed").unwrap();
    for id in 0..8 {
        let uri = fx.collection.token_uri(id).unwrap();
        assert_ne!(uri, format!("ipfs://drop/{}.json", id), "token {} kept its index", id);
    }
}

#[test]
fn allowlist_claim_cap_is_per_account_and_sticky() {
    let member = Account::random();
    let tree = AllowlistTree::new(&[member, Account::random()]).unwrap();
    let mut fx = Fixture::new(10, &[]);
    let admin = fx.admin_ctx();
    fx.collection.set_allowlist_root(&admin, tree.root()).unwrap();
    fx.collection.set_allowlist_active(&admin, true).unwrap();

    let proof = tree.proof_for(&member).unwrap();
    let ctx = CallContext::direct(member, Amount::from_u64(ALLOWLIST_PRICE));
    fx.collection.allowlist_mint(&ctx, &proof, 1).unwrap();

    // Default cap is one claim per account, surviving root rotation
    let next = AllowlistTree::new(&[member]).unwrap();
    fx.collection.set_allowlist_root(&admin, next.root()).unwrap();
    let fresh = next.proof_for(&member).unwrap();
    assert_eq!(
        fx.collection.allowlist_mint(&ctx, &fresh, 1),
        Err(CollectionError::ClaimCapExceeded)
    );
}
