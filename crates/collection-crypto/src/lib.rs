// collection-crypto/src/lib.rs

//! Cryptographic primitives for the collectible issuance ledger
//!
//! This crate provides:
//! - Hashing functions (SHA256, Keccak256)
//! - Opaque account identifiers
//! - Allow-list membership tree and compact proofs

pub mod account;
pub mod allowlist;
pub mod hash;

pub use account::Account;
pub use allowlist::{AllowlistProof, AllowlistTree};
pub use hash::{keccak256, sha256, Hash};

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid hash")]
    InvalidHash,

    #[error("Invalid account")]
    InvalidAccount,

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Allow-list error: {0}")]
    AllowlistError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_basics() {
        // Basic smoke test
        let account = Account::random();
        let tree = AllowlistTree::new(&[account]).unwrap();
        let proof = tree.proof_for(&account).unwrap();
        assert!(proof.verify(tree.root(), &account));
    }
}
