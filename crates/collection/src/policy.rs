// collection/src/policy.rs

use crate::{config::GlobalFlags, CollectionError, CollectionResult};
use collection_core::TokenId;
use collection_crypto::Account;

/// How a transfer entered the ledger
///
/// `StakingExempt` is constructed only inside the owner's staking-exempt
/// entry point and consumed by exactly one policy evaluation; it bypasses
/// the staking lock and nothing else. `Refund` is the refund engine's
/// authorized exemption from the global kill-switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Ordinary,
    StakingExempt,
    Refund,
}

/// Pre-transfer admission decision composed from three restrictions
///
/// Evaluated before every token movement; minting is exempt. Checks run in
/// order: staking lock, global kill-switch, one-token-per-account cap (the
/// custodial account is exempt from the cap).
pub fn authorize_transfer(
    kind: TransferKind,
    id: TokenId,
    staked: bool,
    flags: &GlobalFlags,
    dest: &Account,
    dest_balance: u64,
) -> CollectionResult<()> {
    if staked && kind != TransferKind::StakingExempt {
        return Err(CollectionError::StakingActive(id));
    }
    if flags.transfers_disabled && kind != TransferKind::Refund {
        return Err(CollectionError::TransfersDisabled);
    }
    if dest_balance >= 1 && *dest != flags.custodian {
        return Err(CollectionError::OnlyOneTokenPerAccount);
    }
    Ok(())
}
