// collection-core/src/lib.rs

//! Shared value types and the asset-registry collaborator
//!
//! This crate provides:
//! - Monetary amounts, token identifiers and timestamps
//! - The per-token mint record
//! - The pluggable `AssetRegistry` trait with an in-memory implementation
//! - Call context and clock collaborators injected into the ledger

pub mod registry;
pub mod token;
pub mod types;

pub use registry::{AssetRegistry, InMemoryRegistry};
pub use token::{MintSource, Token};
pub use types::{Amount, CallContext, Clock, ManualClock, SystemClock, Timestamp, TokenId};

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors reported by the asset registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Token {0} does not exist")]
    NonexistentToken(TokenId),

    #[error("Token {0} is not held by the stated owner")]
    WrongOwner(TokenId),
}
