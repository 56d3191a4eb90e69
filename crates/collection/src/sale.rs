// collection/src/sale.rs

use crate::{
    config::SaleConfig, reservation::ReservationLedger, CollectionError, CollectionResult,
};
use collection_core::{Amount, CallContext, MintSource};
use collection_crypto::{Account, AllowlistProof, Hash};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative allow-list claims per account; monotonically non-decreasing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowlistClaims {
    claims: HashMap<Account, u64>,
}

impl AllowlistClaims {
    pub fn claimed(&self, account: &Account) -> u64 {
        self.claims.get(account).copied().unwrap_or(0)
    }

    fn record(&mut self, account: &Account, amount: u64) {
        let total = self.claims.entry(*account).or_insert(0);
        *total = total.saturating_add(amount);
    }
}

/// Authorization produced by a successful sale check, consumed by the facade
///
/// Once a ticket exists every admission check has passed and the ledger-side
/// bookkeeping (reservation debit, claim record) has been committed; token
/// issuance itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintTicket {
    pub source: MintSource,
    pub unit_price: Amount,
    pub amount: u64,
}

/// Central admission gate for the three mint paths
///
/// Enforces phase activation, the direct-caller policy, exact payment,
/// per-call and per-account quantity limits, and the global supply ceiling.
/// Every check has its own failure; a failed authorization mutates nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleController {
    config: SaleConfig,
    reservations: ReservationLedger,
    claims: AllowlistClaims,
    allowlist_root: Hash,
}

impl SaleController {
    /// Build the controller; reserved allowances may not exceed the ceiling
    pub fn new(config: SaleConfig, reservations: ReservationLedger) -> CollectionResult<Self> {
        if reservations.total_reserved() > config.max_supply {
            return Err(CollectionError::ReservationExceedsSupply);
        }
        Ok(Self {
            config,
            reservations,
            claims: AllowlistClaims::default(),
            allowlist_root: Hash::zero(),
        })
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    pub fn reservations(&self) -> &ReservationLedger {
        &self.reservations
    }

    pub fn allowlist_root(&self) -> Hash {
        self.allowlist_root
    }

    /// Cumulative allow-list claims recorded for an account
    pub fn claimed(&self, account: &Account) -> u64 {
        self.claims.claimed(account)
    }

    /// Supply left for paying mints: the ceiling minus outstanding reservations
    fn open_supply(&self) -> u64 {
        self.config
            .max_supply
            .saturating_sub(self.reservations.total_reserved())
    }

    /// Authorize a reserved/internal mint; no payment is collected
    pub fn authorize_internal(
        &mut self,
        caller: &Account,
        amount: u64,
        issued: u64,
    ) -> CollectionResult<MintTicket> {
        if amount == 0 {
            return Err(CollectionError::QuantityLimitExceeded);
        }
        if self.reservations.allowance_of(caller) < amount {
            return Err(CollectionError::InsufficientReservation);
        }
        if exceeds(issued, amount, self.config.max_supply) {
            return Err(CollectionError::SupplyExceeded);
        }

        self.reservations.debit(caller, amount)?;

        Ok(MintTicket {
            source: MintSource::Internal,
            unit_price: Amount::zero(),
            amount,
        })
    }

    /// Authorize an allow-list mint against the published membership root
    pub fn authorize_allowlist(
        &mut self,
        ctx: &CallContext,
        proof: &AllowlistProof,
        amount: u64,
        issued: u64,
    ) -> CollectionResult<MintTicket> {
        if !self.config.allowlist_active {
            return Err(CollectionError::AllowlistNotActive);
        }
        if ctx.sender != ctx.origin {
            return Err(CollectionError::OriginMismatch);
        }
        if amount == 0 {
            return Err(CollectionError::QuantityLimitExceeded);
        }
        if exceeds(issued, amount, self.open_supply()) {
            return Err(CollectionError::SupplyExceeded);
        }
        let expected = self.config.allowlist_price.times(amount);
        if ctx.value != expected {
            return Err(CollectionError::PaymentMismatch {
                expected,
                actual: ctx.value.clone(),
            });
        }
        if exceeds(self.claims.claimed(&ctx.sender), amount, self.config.allowlist_claim_cap) {
            return Err(CollectionError::ClaimCapExceeded);
        }
        if !proof.verify(self.allowlist_root, &ctx.sender) {
            return Err(CollectionError::ProofInvalid);
        }

        self.claims.record(&ctx.sender, amount);

        Ok(MintTicket {
            source: MintSource::Allowlist,
            unit_price: self.config.allowlist_price.clone(),
            amount,
        })
    }

    /// Authorize a public mint
    pub fn authorize_public(
        &mut self,
        ctx: &CallContext,
        amount: u64,
        issued: u64,
    ) -> CollectionResult<MintTicket> {
        if !self.config.public_active {
            return Err(CollectionError::PublicNotActive);
        }
        if ctx.sender != ctx.origin {
            return Err(CollectionError::OriginMismatch);
        }
        if amount == 0 || amount > self.config.public_max_per_call {
            return Err(CollectionError::QuantityLimitExceeded);
        }
        if exceeds(issued, amount, self.open_supply()) {
            return Err(CollectionError::SupplyExceeded);
        }
        let expected = self.config.public_price.times(amount);
        if ctx.value != expected {
            return Err(CollectionError::PaymentMismatch {
                expected,
                actual: ctx.value.clone(),
            });
        }

        Ok(MintTicket {
            source: MintSource::Public,
            unit_price: self.config.public_price.clone(),
            amount,
        })
    }

    // Privileged setters; capability checks happen in the facade

    pub fn set_allowlist_active(&mut self, active: bool) {
        self.config.allowlist_active = active;
    }

    pub fn set_public_active(&mut self, active: bool) {
        self.config.public_active = active;
    }

    pub fn set_prices(&mut self, allowlist_price: Amount, public_price: Amount) {
        self.config.allowlist_price = allowlist_price;
        self.config.public_price = public_price;
    }

    /// Replace the allow-list root (new epoch); recorded claims are kept
    pub fn set_allowlist_root(&mut self, root: Hash) {
        self.allowlist_root = root;
    }
}

/// Overflow-safe `base + amount > limit`; a quantity too large to add is
/// over any limit
fn exceeds(base: u64, amount: u64, limit: u64) -> bool {
    base.checked_add(amount).map_or(true, |total| total > limit)
}
