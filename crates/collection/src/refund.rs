// collection/src/refund.rs

use crate::{config::GlobalFlags, CollectionError, CollectionResult};
use collection_core::{Amount, Token};

/// Refund/buy-back admission and pricing
///
/// Stateless: the refunded flag lives on the token record and the window
/// flag on [`GlobalFlags`]. The repayment is derived from the token's own
/// recorded price, so allow-list and public mints are refunded
/// proportionally to what was actually paid.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefundEngine;

impl RefundEngine {
    /// Repayment for a token: price paid minus the configured fee percentage
    pub fn quote(token: &Token, fee_percent: u64) -> CollectionResult<Amount> {
        let fee = token
            .price_paid
            .percent(fee_percent)
            .ok_or_else(|| {
                CollectionError::InvalidPayoutScheme(format!(
                    "refund fee {}% out of range",
                    fee_percent
                ))
            })?;
        token
            .price_paid
            .checked_sub(&fee)
            .ok_or(CollectionError::InsufficientFunds)
    }

    /// Check refund admission and return the repayment owed
    ///
    /// Ordering: window flag, ownership, idempotence, mint-source. A free
    /// (internal) mint paid nothing and can never be refunded.
    pub fn authorize(
        token: &Token,
        flags: &GlobalFlags,
        caller_is_owner: bool,
    ) -> CollectionResult<Amount> {
        if !flags.refund_active {
            return Err(CollectionError::RefundNotActive);
        }
        if !caller_is_owner {
            return Err(CollectionError::NotTokenOwner(token.id));
        }
        if token.refunded {
            return Err(CollectionError::AlreadyRefunded(token.id));
        }
        if token.is_free_mint() {
            return Err(CollectionError::FreeMintNotRefundable);
        }
        Self::quote(token, flags.refund_fee_percent)
    }
}
