// collection-core/src/types.rs

use collection_crypto::Account;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifier (dense, zero-based, assigned sequentially at mint)
pub type TokenId = u64;

/// Timestamp in Unix epoch seconds
pub type Timestamp = u64;

/// Monetary amount in base units (using BigUint for arbitrary precision)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(BigUint);

impl Amount {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(BigUint::from(0u64))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    pub fn inner(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::from(0u64)
    }

    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        Some(Amount(&self.0 + &other.0))
    }

    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.0 < other.0 {
            None
        } else {
            Some(Amount(&self.0 - &other.0))
        }
    }

    /// Multiply a unit price by a quantity
    pub fn times(&self, factor: u64) -> Amount {
        Amount(&self.0 * BigUint::from(factor))
    }

    /// Floor of `percent`% of this amount; None if percent > 100
    pub fn percent(&self, percent: u64) -> Option<Amount> {
        if percent > 100 {
            return None;
        }
        Some(Amount(&self.0 * BigUint::from(percent) / BigUint::from(100u64)))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context of an external call into the ledger
///
/// `origin` is the account that started the call chain; `sender` is the
/// immediate caller. Mint entry points enforce a direct-caller-only policy
/// by comparing the two. `value` is the payment attached to the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub origin: Account,
    pub sender: Account,
    pub value: Amount,
}

impl CallContext {
    /// A direct call: sender and origin are the same account
    pub fn direct(account: Account, value: Amount) -> Self {
        Self { origin: account, sender: account, value }
    }

    /// A call routed through an intermediary contract
    pub fn relayed(origin: Account, sender: Account, value: Amount) -> Self {
        Self { origin, sender, value }
    }
}

/// Time source injected into the ledger
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Settable clock for tests and deterministic replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self { now: AtomicU64::new(now) }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

// Allows a test to keep a handle on a shared clock it injects
impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
