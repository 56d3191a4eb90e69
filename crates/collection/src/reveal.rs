// collection/src/reveal.rs

use collection_core::TokenId;
use collection_crypto::sha256;
use serde::{Deserialize, Serialize};

/// Token-to-metadata permutation for the reveal
///
/// Before any shuffle the mapping is the identity permutation, grown as
/// tokens are minted. `shuffle` re-permutes the whole array from a supplied
/// seed with a Sattolo pass: each swap partner is drawn strictly below the
/// current position, which yields a single cycle and therefore no fixed
/// points for two or more tokens. Deterministic in the seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevealShuffler {
    order: Vec<TokenId>,
}

impl RevealShuffler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the identity mapping to cover `issued` tokens
    pub fn extend_to(&mut self, issued: u64) {
        while (self.order.len() as u64) < issued {
            self.order.push(self.order.len() as TokenId);
        }
    }

    /// Number of tokens covered by the mapping
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Metadata index a token resolves to; None if the token is not covered
    pub fn resolved_index(&self, id: TokenId) -> Option<TokenId> {
        self.order.get(id as usize).copied()
    }

    /// Re-permute the mapping from an externally supplied seed
    pub fn shuffle(&mut self, seed: &[u8]) {
        let n = self.order.len();
        for i in (1..n).rev() {
            let j = (derive_index(seed, i as u64) % i as u64) as usize;
            self.order.swap(i, j);
        }
    }
}

/// Derive a swap index by hashing seed ‖ position
fn derive_index(seed: &[u8], position: u64) -> u64 {
    let mut data = Vec::with_capacity(seed.len() + 8);
    data.extend_from_slice(seed);
    data.extend_from_slice(&position.to_be_bytes());
    let digest = sha256(&data);
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_be_bytes(word)
}
