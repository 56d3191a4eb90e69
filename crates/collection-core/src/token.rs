// collection-core/src/token.rs

use crate::types::{Amount, TokenId};
use serde::{Deserialize, Serialize};

/// Admission path a token was minted through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintSource {
    /// Reserved allowance mint, no payment collected
    Internal,
    /// Allow-list phase mint at the allow-list price
    Allowlist,
    /// Public phase mint at the public price
    Public,
}

/// Per-token mint record
///
/// `id`, `source` and `price_paid` are fixed for the lifetime of the token;
/// `refunded` flips false to true at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub source: MintSource,
    pub price_paid: Amount,
    pub refunded: bool,
}

impl Token {
    pub fn new(id: TokenId, source: MintSource, price_paid: Amount) -> Self {
        Self { id, source, price_paid, refunded: false }
    }

    /// Reserved-allowance mints collected no payment and cannot be refunded
    pub fn is_free_mint(&self) -> bool {
        self.source == MintSource::Internal
    }
}
