// collection/src/contract.rs

use crate::{
    config::{GlobalFlags, SaleConfig},
    metadata,
    policy::{self, TransferKind},
    refund::RefundEngine,
    reservation::ReservationLedger,
    reveal::RevealShuffler,
    sale::{MintTicket, SaleController},
    staking::{StakeStatus, StakingLifecycle},
    treasury::PayoutScheme,
    CollectionError, CollectionResult,
};
use collection_core::{
    Amount, AssetRegistry, CallContext, Clock, Token, TokenId,
};
use collection_crypto::{Account, AllowlistProof, Hash};
use std::collections::HashMap;

/// Explicit re-entrancy latch: set on entry, cleared on every exit path
#[derive(Debug, Default)]
struct ReentrancyLatch {
    entered: bool,
}

impl ReentrancyLatch {
    fn enter(&mut self) -> CollectionResult<()> {
        if self.entered {
            return Err(CollectionError::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) {
        self.entered = false;
    }
}

/// The collection ledger facade
///
/// Composes the sale controller, staking lifecycle, transfer policy,
/// refund engine, reveal shuffler and treasury split over a pluggable
/// asset registry. Every external entry point runs as a single atomic
/// step: a rejected call leaves all state unchanged.
pub struct Collection<R: AssetRegistry> {
    admin: Account,
    flags: GlobalFlags,
    sale: SaleController,
    staking: StakingLifecycle,
    shuffler: RevealShuffler,
    tokens: HashMap<TokenId, Token>,
    registry: R,
    clock: Box<dyn Clock>,
    balance: Amount,
    payout: Option<PayoutScheme>,
    latch: ReentrancyLatch,
}

impl<R: AssetRegistry> Collection<R> {
    /// Build the ledger; fails if the reserved allowances already exceed
    /// the supply ceiling
    pub fn new(
        admin: Account,
        custodian: Account,
        config: SaleConfig,
        reservations: ReservationLedger,
        registry: R,
        clock: Box<dyn Clock>,
    ) -> CollectionResult<Self> {
        Ok(Self {
            admin,
            flags: GlobalFlags::new(custodian),
            sale: SaleController::new(config, reservations)?,
            staking: StakingLifecycle::new(),
            shuffler: RevealShuffler::new(),
            tokens: HashMap::new(),
            registry,
            clock,
            balance: Amount::zero(),
            payout: None,
            latch: ReentrancyLatch::default(),
        })
    }

    // ---- mint entry points ----

    /// Mint against the caller's reserved allowance; no payment accepted
    pub fn internal_mint(&mut self, ctx: &CallContext, amount: u64) -> CollectionResult<Vec<TokenId>> {
        self.latch.enter()?;
        let result = self.internal_mint_inner(ctx, amount);
        self.latch.exit();
        result
    }

    fn internal_mint_inner(&mut self, ctx: &CallContext, amount: u64) -> CollectionResult<Vec<TokenId>> {
        if !ctx.value.is_zero() {
            return Err(CollectionError::PaymentMismatch {
                expected: Amount::zero(),
                actual: ctx.value.clone(),
            });
        }
        let issued = self.registry.total_issued();
        let ticket = self.sale.authorize_internal(&ctx.sender, amount, issued)?;
        Ok(self.commit_mint(ctx, ticket))
    }

    /// Mint during the allow-list phase with a membership proof
    pub fn allowlist_mint(
        &mut self,
        ctx: &CallContext,
        proof: &AllowlistProof,
        amount: u64,
    ) -> CollectionResult<Vec<TokenId>> {
        self.latch.enter()?;
        let result = self.allowlist_mint_inner(ctx, proof, amount);
        self.latch.exit();
        result
    }

    fn allowlist_mint_inner(
        &mut self,
        ctx: &CallContext,
        proof: &AllowlistProof,
        amount: u64,
    ) -> CollectionResult<Vec<TokenId>> {
        let issued = self.registry.total_issued();
        let ticket = self.sale.authorize_allowlist(ctx, proof, amount, issued)?;
        Ok(self.commit_mint(ctx, ticket))
    }

    /// Mint during the public phase
    pub fn public_mint(&mut self, ctx: &CallContext, amount: u64) -> CollectionResult<Vec<TokenId>> {
        self.latch.enter()?;
        let result = self.public_mint_inner(ctx, amount);
        self.latch.exit();
        result
    }

    fn public_mint_inner(&mut self, ctx: &CallContext, amount: u64) -> CollectionResult<Vec<TokenId>> {
        let issued = self.registry.total_issued();
        let ticket = self.sale.authorize_public(ctx, amount, issued)?;
        Ok(self.commit_mint(ctx, ticket))
    }

    /// Issue tokens for an authorized ticket; cannot fail past this point
    fn commit_mint(&mut self, ctx: &CallContext, ticket: MintTicket) -> Vec<TokenId> {
        let mut ids = Vec::with_capacity(ticket.amount as usize);
        for _ in 0..ticket.amount {
            let id = self.registry.issue(ctx.sender);
            self.tokens
                .insert(id, Token::new(id, ticket.source, ticket.unit_price.clone()));
            ids.push(id);
        }
        self.shuffler.extend_to(self.registry.total_issued());
        if let Some(balance) = self.balance.checked_add(&ctx.value) {
            self.balance = balance;
        }

        debug_assert!(
            self.registry.total_issued() + self.sale.reservations().total_reserved()
                <= self.sale.config().max_supply
        );

        tracing::debug!(
            minter = %ctx.sender,
            source = ?ticket.source,
            amount = ticket.amount,
            "mint committed"
        );
        ids
    }

    // ---- transfers ----

    /// Ordinary transfer by the owner or an approved operator
    pub fn transfer(&mut self, ctx: &CallContext, to: Account, id: TokenId) -> CollectionResult<()> {
        let owner = self.registry.owner_of(id)?;
        if !self.registry.is_approved_or_owner(&ctx.sender, id)? {
            return Err(CollectionError::NotApprovedOrOwner(id));
        }
        self.guarded_transfer(TransferKind::Ordinary, owner, to, id)
    }

    /// Move a staked token without unstaking; current owner only
    ///
    /// The staking exemption is a one-shot capability constructed here and
    /// consumed by exactly one policy evaluation. It bypasses the staking
    /// lock and nothing else.
    pub fn staking_exempt_transfer(
        &mut self,
        ctx: &CallContext,
        to: Account,
        id: TokenId,
    ) -> CollectionResult<()> {
        let owner = self.registry.owner_of(id)?;
        if owner != ctx.sender {
            return Err(CollectionError::NotTokenOwner(id));
        }
        self.guarded_transfer(TransferKind::StakingExempt, owner, to, id)
    }

    /// Run the pre-transfer guard, then move the token
    fn guarded_transfer(
        &mut self,
        kind: TransferKind,
        from: Account,
        to: Account,
        id: TokenId,
    ) -> CollectionResult<()> {
        policy::authorize_transfer(
            kind,
            id,
            self.staking.is_staked(id),
            &self.flags,
            &to,
            self.registry.balance_of(&to),
        )?;
        self.registry.transfer(from, to, id)?;
        Ok(())
    }

    /// Grant a single-token approval; owner only
    pub fn approve(&mut self, ctx: &CallContext, operator: Account, id: TokenId) -> CollectionResult<()> {
        let owner = self.registry.owner_of(id)?;
        if owner != ctx.sender {
            return Err(CollectionError::NotTokenOwner(id));
        }
        self.registry.approve(operator, id)?;
        Ok(())
    }

    // ---- staking ----

    /// Toggle a token's staking state; owner or approved operator only
    pub fn toggle_staking(&mut self, ctx: &CallContext, id: TokenId) -> CollectionResult<bool> {
        if !self.registry.is_approved_or_owner(&ctx.sender, id)? {
            return Err(CollectionError::NotApprovedOrOwner(id));
        }
        let now = self.clock.now();
        self.staking.toggle(id, self.flags.staking_open, now)
    }

    /// Toggle a list of tokens, each evaluated independently
    ///
    /// Partial success is allowed: one token's failure does not gate the
    /// others. Results are reported per identifier.
    pub fn toggle_staking_batch(
        &mut self,
        ctx: &CallContext,
        ids: &[TokenId],
    ) -> Vec<(TokenId, CollectionResult<bool>)> {
        ids.iter()
            .map(|id| (*id, self.toggle_staking(ctx, *id)))
            .collect()
    }

    /// Current and lifetime staking durations for a token
    pub fn staking_period(&self, id: TokenId) -> CollectionResult<StakeStatus> {
        self.registry.owner_of(id)?;
        Ok(self.staking.status(id, self.clock.now()))
    }

    // ---- refund ----

    /// Return a paid token for partial repayment to `to`
    pub fn refund(&mut self, ctx: &CallContext, to: Account, id: TokenId) -> CollectionResult<Amount> {
        self.latch.enter()?;
        let result = self.refund_inner(ctx, to, id);
        self.latch.exit();
        result
    }

    fn refund_inner(&mut self, ctx: &CallContext, to: Account, id: TokenId) -> CollectionResult<Amount> {
        let owner = self.registry.owner_of(id)?;
        let token = self
            .tokens
            .get(&id)
            .ok_or(CollectionError::NonexistentToken(id))?;

        let repayment = RefundEngine::authorize(token, &self.flags, owner == ctx.sender)?;

        // All checks before any mutation
        policy::authorize_transfer(
            TransferKind::Refund,
            id,
            self.staking.is_staked(id),
            &self.flags,
            &self.flags.custodian,
            self.registry.balance_of(&self.flags.custodian),
        )?;
        let remaining = self
            .balance
            .checked_sub(&repayment)
            .ok_or(CollectionError::InsufficientFunds)?;

        let custodian = self.flags.custodian;
        self.registry.transfer(owner, custodian, id)?;
        if let Some(record) = self.tokens.get_mut(&id) {
            record.refunded = true;
        }
        self.balance = remaining;

        tracing::debug!(token = id, payee = %to, amount = %repayment, "refund committed");
        Ok(repayment)
    }

    // ---- reads ----

    /// Metadata URI for a token
    pub fn token_uri(&self, id: TokenId) -> CollectionResult<String> {
        metadata::token_uri(id, self.registry.total_issued(), &self.flags, &self.shuffler)
    }

    /// Whether a proof admits an account under the current root
    pub fn is_on_allowlist(&self, proof: &AllowlistProof, account: &Account) -> bool {
        proof.verify(self.sale.allowlist_root(), account)
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    pub fn balance(&self) -> &Amount {
        &self.balance
    }

    pub fn flags(&self) -> &GlobalFlags {
        &self.flags
    }

    pub fn sale(&self) -> &SaleController {
        &self.sale
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Stray payments are rejected, never silently kept
    pub fn receive(&self, _value: &Amount) -> CollectionResult<()> {
        Err(CollectionError::UnsolicitedPayment)
    }

    // ---- privileged configuration ----

    fn ensure_admin(&self, ctx: &CallContext) -> CollectionResult<()> {
        if ctx.sender != self.admin {
            return Err(CollectionError::NotAdmin);
        }
        Ok(())
    }

    pub fn set_allowlist_active(&mut self, ctx: &CallContext, active: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.sale.set_allowlist_active(active);
        tracing::info!(active, "allow-list phase flag updated");
        Ok(())
    }

    pub fn set_public_active(&mut self, ctx: &CallContext, active: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.sale.set_public_active(active);
        tracing::info!(active, "public phase flag updated");
        Ok(())
    }

    pub fn set_prices(
        &mut self,
        ctx: &CallContext,
        allowlist_price: Amount,
        public_price: Amount,
    ) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        tracing::info!(%allowlist_price, %public_price, "prices updated");
        self.sale.set_prices(allowlist_price, public_price);
        Ok(())
    }

    pub fn set_allowlist_root(&mut self, ctx: &CallContext, root: Hash) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.sale.set_allowlist_root(root);
        tracing::info!(%root, "allow-list root replaced");
        Ok(())
    }

    pub fn set_reveal(&mut self, ctx: &CallContext, revealed: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.revealed = revealed;
        tracing::info!(revealed, "reveal flag updated");
        Ok(())
    }

    pub fn set_base_uri(&mut self, ctx: &CallContext, uri: String) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.base_uri = uri;
        Ok(())
    }

    pub fn set_unrevealed_uri(&mut self, ctx: &CallContext, uri: String) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.unrevealed_uri = uri;
        Ok(())
    }

    pub fn set_staking_open(&mut self, ctx: &CallContext, open: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.staking_open = open;
        tracing::info!(open, "staking window flag updated");
        Ok(())
    }

    pub fn set_transfers_disabled(&mut self, ctx: &CallContext, disabled: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.transfers_disabled = disabled;
        tracing::info!(disabled, "transfer kill-switch updated");
        Ok(())
    }

    pub fn set_refund_active(&mut self, ctx: &CallContext, active: bool) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.refund_active = active;
        tracing::info!(active, "refund window flag updated");
        Ok(())
    }

    pub fn set_custodian(&mut self, ctx: &CallContext, custodian: Account) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.flags.custodian = custodian;
        tracing::info!(%custodian, "custodian updated");
        Ok(())
    }

    pub fn set_payout_scheme(&mut self, ctx: &CallContext, scheme: PayoutScheme) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        self.payout = Some(scheme);
        Ok(())
    }

    /// Re-permute the metadata mapping from a supplied seed
    ///
    /// Only meaningful once reveal is pending; deterministic in the seed,
    /// so a repeat call with the same seed is idempotent.
    pub fn shuffle_reveal(&mut self, ctx: &CallContext, seed: &[u8]) -> CollectionResult<()> {
        self.ensure_admin(ctx)?;
        if !self.flags.revealed {
            return Err(CollectionError::RevealNotActive);
        }
        self.shuffler.extend_to(self.registry.total_issued());
        self.shuffler.shuffle(seed);
        tracing::info!(tokens = self.shuffler.len(), "reveal order shuffled");
        Ok(())
    }

    /// Pay out the accumulated balance by the configured split
    pub fn withdraw(&mut self, ctx: &CallContext) -> CollectionResult<Vec<(Account, Amount)>> {
        self.latch.enter()?;
        let result = self.withdraw_inner(ctx);
        self.latch.exit();
        result
    }

    fn withdraw_inner(&mut self, ctx: &CallContext) -> CollectionResult<Vec<(Account, Amount)>> {
        self.ensure_admin(ctx)?;
        let scheme = self
            .payout
            .as_ref()
            .ok_or_else(|| CollectionError::InvalidPayoutScheme("no payout scheme configured".into()))?;

        let payouts = scheme.split(&self.balance);
        tracing::info!(total = %self.balance, payees = payouts.len(), "balance withdrawn");
        self.balance = Amount::zero();
        Ok(payouts)
    }
}
