// collection/src/metadata.rs

use crate::{config::GlobalFlags, reveal::RevealShuffler, CollectionError, CollectionResult};
use collection_core::TokenId;

/// Resolve a token's metadata URI
///
/// All tokens share the placeholder URI until the reveal flag is set; after
/// reveal the URI is `base_uri` + resolved index + `.json`, where the index
/// is the identity prior to any shuffle and the shuffled mapping afterward.
pub fn token_uri(
    id: TokenId,
    issued: u64,
    flags: &GlobalFlags,
    shuffler: &RevealShuffler,
) -> CollectionResult<String> {
    if id >= issued {
        return Err(CollectionError::NonexistentToken(id));
    }
    if !flags.revealed {
        return Ok(flags.unrevealed_uri.clone());
    }
    let index = shuffler
        .resolved_index(id)
        .ok_or(CollectionError::NonexistentToken(id))?;
    Ok(format!("{}{}.json", flags.base_uri, index))
}
