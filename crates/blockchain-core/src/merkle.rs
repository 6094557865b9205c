//! Merkle roots over ordered transaction lists.
//!
//! - No transactions: [`ZERO_HASH`].
//! - One transaction: its leaf digest, unhashed.
//! - Odd levels: the last node is paired with itself.
//!
//! Nothing is cached; the root is rebuilt from the leaves on every call.

use crate::{
    constants::{HASH_SIZE, ZERO_HASH},
    sha256, Hash, Transaction,
};

pub fn merkle_root(txs: &[Transaction]) -> Hash {
    merkle_root_from_leaves(txs.iter().map(Transaction::hash).collect())
}

/// Reduces precomputed leaf digests to a single root.
pub fn merkle_root_from_leaves(mut level: Vec<Hash>) -> Hash {
    if level.is_empty() {
        return ZERO_HASH;
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                hash_pair(&left, &right)
            })
            .collect();
    }
    level[0]
}

/// Parent node digest: SHA-256 of `left ‖ right`.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut concat = [0u8; 2 * HASH_SIZE];
    concat[..HASH_SIZE].copy_from_slice(left);
    concat[HASH_SIZE..].copy_from_slice(right);
    sha256(concat)
}
