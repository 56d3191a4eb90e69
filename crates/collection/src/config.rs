// collection/src/config.rs

use collection_core::Amount;
use collection_crypto::Account;
use serde::{Deserialize, Serialize};

/// Sale-phase configuration
///
/// Prices and phase flags are owner-mutable; `max_supply` is fixed at
/// construction and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Unit price during the allow-list phase
    pub allowlist_price: Amount,
    /// Unit price during the public phase
    pub public_price: Amount,
    /// Allow-list phase flag
    pub allowlist_active: bool,
    /// Public phase flag
    pub public_active: bool,
    /// Cumulative allow-list claims permitted per account
    pub allowlist_claim_cap: u64,
    /// Maximum quantity per public mint call
    pub public_max_per_call: u64,
    /// Immutable global supply ceiling
    pub max_supply: u64,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            allowlist_price: Amount::from_u64(50_000_000_000_000_000), // 0.05 in base units
            public_price: Amount::from_u64(80_000_000_000_000_000),    // 0.08 in base units
            allowlist_active: false,
            public_active: false,
            allowlist_claim_cap: 1,
            public_max_per_call: 2,
            max_supply: 5_000,
        }
    }
}

/// Global lifecycle flags, each independently owner-toggleable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalFlags {
    /// Metadata reveal flag
    pub revealed: bool,
    /// Global transfer kill-switch; ships enabled
    pub transfers_disabled: bool,
    /// Whether staking may be started
    pub staking_open: bool,
    /// Whether the refund window is open
    pub refund_active: bool,
    /// Custodial account receiving refunded tokens; exempt from the
    /// one-token-per-account cap
    pub custodian: Account,
    /// Percentage withheld from a refund as cost recovery
    pub refund_fee_percent: u64,
    /// Metadata base URI used after reveal
    pub base_uri: String,
    /// Placeholder URI served for every token before reveal
    pub unrevealed_uri: String,
}

impl GlobalFlags {
    pub fn new(custodian: Account) -> Self {
        Self {
            revealed: false,
            transfers_disabled: true,
            staking_open: false,
            refund_active: false,
            custodian,
            refund_fee_percent: 20,
            base_uri: String::new(),
            unrevealed_uri: String::new(),
        }
    }
}
