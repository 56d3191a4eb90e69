// collection/src/treasury.rs

use crate::{CollectionError, CollectionResult};
use collection_core::Amount;
use collection_crypto::Account;
use serde::{Deserialize, Serialize};

/// Fixed-percentage payout split for accumulated sale funds
///
/// Shares must sum to exactly 100. The production deployment splits to six
/// payees; the scheme itself accepts any non-empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutScheme {
    shares: Vec<(Account, u64)>,
}

impl PayoutScheme {
    pub fn new(shares: Vec<(Account, u64)>) -> CollectionResult<Self> {
        if shares.is_empty() {
            return Err(CollectionError::InvalidPayoutScheme("no payees".into()));
        }
        let total: u64 = shares.iter().map(|(_, pct)| pct).sum();
        if total != 100 {
            return Err(CollectionError::InvalidPayoutScheme(format!(
                "shares sum to {}%, expected 100%",
                total
            )));
        }
        Ok(Self { shares })
    }

    pub fn payees(&self) -> &[(Account, u64)] {
        &self.shares
    }

    /// Split a balance by the configured percentages
    ///
    /// Rounding dust from the integer division goes to the final payee so
    /// the split always totals the input exactly.
    pub fn split(&self, balance: &Amount) -> Vec<(Account, Amount)> {
        let mut payouts = Vec::with_capacity(self.shares.len());
        let mut distributed = Amount::zero();

        for (account, pct) in &self.shares[..self.shares.len() - 1] {
            let share = balance.percent(*pct).unwrap_or_else(Amount::zero);
            distributed = distributed.checked_add(&share).unwrap_or(distributed);
            payouts.push((*account, share));
        }

        let (last, _) = self.shares[self.shares.len() - 1];
        let remainder = balance.checked_sub(&distributed).unwrap_or_else(Amount::zero);
        payouts.push((last, remainder));
        payouts
    }
}
