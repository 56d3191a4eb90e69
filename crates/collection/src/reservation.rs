// collection/src/reservation.rs

use crate::{CollectionError, CollectionResult};
use collection_crypto::Account;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pool of reserved, non-paying mint allowances
///
/// Allowances are fixed at construction and only ever debited; there is no
/// top-up path. Invariant: the sum of remaining allowances always equals
/// `total_reserved`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationLedger {
    allowances: HashMap<Account, u64>,
    total_reserved: u64,
}

impl ReservationLedger {
    /// Build the ledger from initial grants; duplicate accounts accumulate
    pub fn new(grants: &[(Account, u64)]) -> Self {
        let mut allowances: HashMap<Account, u64> = HashMap::new();
        let mut total_reserved = 0u64;
        for (account, amount) in grants {
            if *amount == 0 {
                continue;
            }
            *allowances.entry(*account).or_insert(0) += amount;
            total_reserved += amount;
        }
        Self { allowances, total_reserved }
    }

    /// Remaining allowance of an account
    pub fn allowance_of(&self, account: &Account) -> u64 {
        self.allowances.get(account).copied().unwrap_or(0)
    }

    /// Aggregate remaining reserved supply
    pub fn total_reserved(&self) -> u64 {
        self.total_reserved
    }

    /// Debit an account's allowance and the aggregate atomically
    pub fn debit(&mut self, account: &Account, amount: u64) -> CollectionResult<()> {
        let remaining = self.allowance_of(account);
        if remaining < amount {
            return Err(CollectionError::InsufficientReservation);
        }
        if remaining == amount {
            self.allowances.remove(account);
        } else {
            self.allowances.insert(*account, remaining - amount);
        }
        self.total_reserved -= amount;
        Ok(())
    }
}
