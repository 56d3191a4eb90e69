// collection/src/staking.rs

use crate::{CollectionError, CollectionResult};
use collection_core::{Timestamp, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-token staking record
///
/// `start == 0` means not currently staked; `cumulative` holds lifetime
/// staked seconds and only grows, only on unstake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub start: Timestamp,
    pub cumulative: u64,
}

/// Snapshot of a token's staking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeStatus {
    /// Whether the token is currently staked
    pub staked: bool,
    /// Open-ended duration of the current stake, zero if unstaked
    pub current_period: u64,
    /// Lifetime staked duration accumulated over closed stakes
    pub total_period: u64,
}

/// Time-accounting staking state machine, keyed by token
///
/// Records are independent of ownership, so a stake survives transfers made
/// through the staking-exempt path. Ownership authorization is the caller's
/// responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakingLifecycle {
    records: HashMap<TokenId, StakeRecord>,
}

impl StakingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a token is currently staked
    pub fn is_staked(&self, id: TokenId) -> bool {
        self.records.get(&id).map(|r| r.start != 0).unwrap_or(false)
    }

    /// Flip a token's staking state
    ///
    /// Starting a stake requires the staking-open flag and records `now`;
    /// stopping always succeeds and folds the elapsed time into the
    /// cumulative total. Returns the new staked state.
    pub fn toggle(
        &mut self,
        id: TokenId,
        staking_open: bool,
        now: Timestamp,
    ) -> CollectionResult<bool> {
        let record = self.records.entry(id).or_default();
        if record.start == 0 {
            if !staking_open {
                return Err(CollectionError::StakingClosed);
            }
            record.start = now;
            Ok(true)
        } else {
            record.cumulative += now.saturating_sub(record.start);
            record.start = 0;
            Ok(false)
        }
    }

    /// Report current and lifetime staking durations
    pub fn status(&self, id: TokenId, now: Timestamp) -> StakeStatus {
        let record = self.records.get(&id).copied().unwrap_or_default();
        let current = if record.start == 0 {
            0
        } else {
            now.saturating_sub(record.start)
        };
        StakeStatus {
            staked: record.start != 0,
            current_period: current,
            total_period: record.cumulative,
        }
    }
}
