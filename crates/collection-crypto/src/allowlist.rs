// collection-crypto/src/allowlist.rs

use crate::{hash::keccak256, Account, CryptoError, CryptoResult, Hash};
use serde::{Deserialize, Serialize};

/// Hash of an allow-list leaf (an account identifier)
pub fn leaf_hash(account: &Account) -> Hash {
    keccak256(account.as_bytes())
}

/// Order-independent pairing hash for internal nodes
///
/// The pair is sorted byte-wise before hashing, so a proof carries only
/// sibling hashes and never left/right position bits.
pub fn pair_hash(a: Hash, b: Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut combined = Vec::with_capacity(64);
    combined.extend_from_slice(lo.as_bytes());
    combined.extend_from_slice(hi.as_bytes());
    keccak256(&combined)
}

/// Binary hash tree over a fixed membership set of accounts
///
/// Published once off-ledger; the ledger stores only the root. Levels are
/// built bottom-up with `pair_hash`; an unpaired node is promoted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowlistTree {
    /// Tree levels, leaves first
    levels: Vec<Vec<Hash>>,
    /// Sorted, deduplicated member accounts
    members: Vec<Account>,
}

impl AllowlistTree {
    /// Build a membership tree from a set of accounts
    pub fn new(accounts: &[Account]) -> CryptoResult<Self> {
        if accounts.is_empty() {
            return Err(CryptoError::AllowlistError("Cannot build empty allow-list".into()));
        }

        let mut members = accounts.to_vec();
        members.sort();
        members.dedup();

        let mut levels = vec![members.iter().map(leaf_hash).collect::<Vec<_>>()];

        while levels.last().map(Vec::len).unwrap_or(0) > 1 {
            let below = levels.last().unwrap();
            let mut level = Vec::with_capacity(below.len().div_ceil(2));
            for pair in below.chunks(2) {
                match pair {
                    [left, right] => level.push(pair_hash(*left, *right)),
                    [odd] => level.push(*odd),
                    _ => unreachable!(),
                }
            }
            levels.push(level);
        }

        Ok(Self { levels, members })
    }

    /// Root commitment to the membership set
    pub fn root(&self) -> Hash {
        self.levels.last().expect("tree has at least one level")[0]
    }

    /// Number of member accounts
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Generate a membership proof, or None if the account is not a member
    pub fn proof_for(&self, account: &Account) -> Option<AllowlistProof> {
        let mut index = self.members.binary_search(account).ok()?;
        let mut siblings = Vec::new();

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
            if let Some(hash) = level.get(sibling) {
                siblings.push(*hash);
            }
            index /= 2;
        }

        Some(AllowlistProof { siblings })
    }
}

/// Compact membership proof: the sibling hashes on the path to the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistProof {
    siblings: Vec<Hash>,
}

impl AllowlistProof {
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// Recompute the root from the account's leaf and compare
    pub fn verify(&self, root: Hash, account: &Account) -> bool {
        let computed = self
            .siblings
            .iter()
            .fold(leaf_hash(account), |acc, sibling| pair_hash(acc, *sibling));
        computed == root
    }
}
