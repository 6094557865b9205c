//! Proof-of-work blockchain core.
//!
//! Transactions are summarised by a Merkle root, embedded in a block header
//! together with the previous block's hash, and sealed by searching for a
//! nonce whose header digest has enough leading zero bits. [`Blockchain`]
//! owns the blocks and [`Blockchain::validate`] reports any block whose
//! stored fields no longer agree with each other or with its predecessor.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod block;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod merkle;
pub mod pow;
pub mod transaction;
pub mod validation;

pub use block::{Block, BlockHeader};
pub use chain::Blockchain;
pub use config::{ChainConfig, MiningConfig, MiningStrategy};
pub use error::{ChainError, Result};
pub use merkle::{merkle_root, merkle_root_from_leaves};
pub use pow::Difficulty;
pub use transaction::Transaction;
pub use validation::{ValidationFault, ValidationReport};

/// A SHA-256 digest.
pub type Hash = [u8; constants::HASH_SIZE];

/// SHA-256 over `bytes`.
pub fn sha256(bytes: impl AsRef<[u8]>) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; constants::HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}

/// Seconds since the unix epoch. A clock set before 1970 reads as 0.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn unix_now_is_after_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
