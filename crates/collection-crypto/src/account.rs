// collection-crypto/src/account.rs

use crate::{CryptoError, CryptoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier size in bytes
pub const ACCOUNT_SIZE: usize = 20;

/// Opaque account handle for owners, minters and payees
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
pub struct Account([u8; ACCOUNT_SIZE]);

impl Account {
    /// Create account from bytes
    pub fn new(bytes: [u8; ACCOUNT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generate a random account identifier
    pub fn random() -> Self {
        use rand::RngCore;

        let mut bytes = [0u8; ACCOUNT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| CryptoError::DeserializationError(e.to_string()))?;
        if bytes.len() != ACCOUNT_SIZE {
            return Err(CryptoError::InvalidAccount);
        }
        let mut arr = [0u8; ACCOUNT_SIZE];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn zero() -> Self {
        Self([0u8; ACCOUNT_SIZE])
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.to_hex())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
