// collection-core/src/registry.rs

use crate::{types::TokenId, RegistryError, RegistryResult};
use collection_crypto::Account;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Durable token-ownership ledger (external collaborator)
///
/// Owns the identifier-to-owner mapping and raw transfer mechanics.
/// Policy decisions (staking locks, transfer kill-switch, holding caps)
/// live above this trait: the facade evaluates its pre-transfer guard
/// before every `transfer` call. Minting is exempt from that guard.
pub trait AssetRegistry {
    /// Issue the next sequential token to `owner` and return its identifier
    fn issue(&mut self, owner: Account) -> TokenId;

    /// Current owner of a token
    fn owner_of(&self, id: TokenId) -> RegistryResult<Account>;

    /// Number of tokens held by an account
    fn balance_of(&self, account: &Account) -> u64;

    /// Total number of tokens issued so far
    fn total_issued(&self) -> u64;

    /// Move a token from its recorded owner to another account
    fn transfer(&mut self, from: Account, to: Account, id: TokenId) -> RegistryResult<()>;

    /// Grant a single-token approval to an operator
    fn approve(&mut self, operator: Account, id: TokenId) -> RegistryResult<()>;

    /// Whether `who` is the owner of `id` or its approved operator
    fn is_approved_or_owner(&self, who: &Account, id: TokenId) -> RegistryResult<bool>;
}

/// Reference in-memory registry implementation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRegistry {
    owners: HashMap<TokenId, Account>,
    approvals: HashMap<TokenId, Account>,
    balances: HashMap<Account, u64>,
    next_id: TokenId,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetRegistry for InMemoryRegistry {
    fn issue(&mut self, owner: Account) -> TokenId {
        let id = self.next_id;
        self.next_id += 1;
        self.owners.insert(id, owner);
        *self.balances.entry(owner).or_insert(0) += 1;
        tracing::trace!(token = id, owner = %owner, "token issued");
        id
    }

    fn owner_of(&self, id: TokenId) -> RegistryResult<Account> {
        self.owners
            .get(&id)
            .copied()
            .ok_or(RegistryError::NonexistentToken(id))
    }

    fn balance_of(&self, account: &Account) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_issued(&self) -> u64 {
        self.next_id
    }

    fn transfer(&mut self, from: Account, to: Account, id: TokenId) -> RegistryResult<()> {
        let owner = self.owner_of(id)?;
        if owner != from {
            return Err(RegistryError::WrongOwner(id));
        }

        // Approvals do not survive a transfer
        self.approvals.remove(&id);
        self.owners.insert(id, to);

        if let Some(balance) = self.balances.get_mut(&from) {
            *balance = balance.saturating_sub(1);
        }
        *self.balances.entry(to).or_insert(0) += 1;

        tracing::trace!(token = id, %from, %to, "token transferred");
        Ok(())
    }

    fn approve(&mut self, operator: Account, id: TokenId) -> RegistryResult<()> {
        self.owner_of(id)?;
        self.approvals.insert(id, operator);
        Ok(())
    }

    fn is_approved_or_owner(&self, who: &Account, id: TokenId) -> RegistryResult<bool> {
        let owner = self.owner_of(id)?;
        Ok(owner == *who || self.approvals.get(&id) == Some(who))
    }
}
