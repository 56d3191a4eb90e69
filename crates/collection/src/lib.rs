// collection/src/lib.rs

//! Self-custodying digital-collectible issuance and lifecycle ledger
//!
//! This crate implements the five invariant-preserving mechanisms of the
//! collection:
//! - Phased, supply-constrained minting over three admission paths
//!   (reserved/internal, allow-listed, public)
//! - Allow-list membership verification with per-account claim limits
//! - A time-accounting staking lifecycle that survives transfers
//! - An idempotent, mint-source-aware refund/buy-back engine
//! - A composed transfer-policy guard (kill-switch, staking lock,
//!   one-token-per-account cap)
//!
//! plus the seeded reveal shuffle, metadata resolution and treasury payout
//! split, all composed behind the [`Collection`] facade.

pub mod config;
pub mod contract;
pub mod metadata;
pub mod policy;
pub mod refund;
pub mod reservation;
pub mod reveal;
pub mod sale;
pub mod staking;
pub mod treasury;

pub use config::{GlobalFlags, SaleConfig};
pub use contract::Collection;
pub use policy::TransferKind;
pub use refund::RefundEngine;
pub use reservation::ReservationLedger;
pub use reveal::RevealShuffler;
pub use sale::{MintTicket, SaleController};
pub use staking::{StakeStatus, StakingLifecycle};
pub use treasury::PayoutScheme;

use collection_core::{Amount, RegistryError, TokenId};

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Every failure the ledger can report, one named variant per cause
///
/// There is no generic catch-all: callers and tests assert on the specific
/// outcome, and every rejected call leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    // Admission
    #[error("Allow-list phase is not active")]
    AllowlistNotActive,

    #[error("Public phase is not active")]
    PublicNotActive,

    #[error("Minting is restricted to direct callers")]
    OriginMismatch,

    #[error("Requested quantity exceeds the per-call limit")]
    QuantityLimitExceeded,

    #[error("Mint would exceed the remaining supply")]
    SupplyExceeded,

    #[error("Attached payment does not match the price (expected {expected}, got {actual})")]
    PaymentMismatch { expected: Amount, actual: Amount },

    // Proof / claims
    #[error("Insufficient reserved allowance")]
    InsufficientReservation,

    #[error("Reserved allowances exceed the supply ceiling")]
    ReservationExceedsSupply,

    #[error("Claim would exceed the per-account allow-list cap")]
    ClaimCapExceeded,

    #[error("Allow-list membership proof is invalid")]
    ProofInvalid,

    // Authorization
    #[error("Caller is not the administrator")]
    NotAdmin,

    #[error("Caller is not the owner of token {0}")]
    NotTokenOwner(TokenId),

    #[error("Caller is neither owner nor approved operator of token {0}")]
    NotApprovedOrOwner(TokenId),

    // Staking state
    #[error("Staking is not open")]
    StakingClosed,

    // Transfer policy
    #[error("Token {0} is staked and cannot be transferred")]
    StakingActive(TokenId),

    #[error("Transfers are globally disabled")]
    TransfersDisabled,

    #[error("Destination account may hold at most one token")]
    OnlyOneTokenPerAccount,

    // Refund state
    #[error("Refund window is not active")]
    RefundNotActive,

    #[error("Token {0} has already been refunded")]
    AlreadyRefunded(TokenId),

    #[error("Free mints are not refundable")]
    FreeMintNotRefundable,

    // Lookup
    #[error("Token {0} was never issued")]
    NonexistentToken(TokenId),

    // Reveal
    #[error("Reveal is not active")]
    RevealNotActive,

    // Call hygiene
    #[error("Re-entrant call rejected")]
    ReentrantCall,

    #[error("Unsolicited payment rejected")]
    UnsolicitedPayment,

    // Funds
    #[error("Contract balance cannot cover the payout")]
    InsufficientFunds,

    #[error("Payout scheme is invalid: {0}")]
    InvalidPayoutScheme(String),
}

// Registry failures surface as the ledger's own named outcomes
impl From<RegistryError> for CollectionError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NonexistentToken(id) => CollectionError::NonexistentToken(id),
            RegistryError::WrongOwner(id) => CollectionError::NotTokenOwner(id),
        }
    }
}
