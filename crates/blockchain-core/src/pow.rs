//! Proof-of-work: a header hash meets a [`Difficulty`] of `d` when its first
//! `d` bits are zero.

use crate::{
    block::BlockHeader,
    config::{MiningConfig, MiningStrategy},
    constants::{DEFAULT_DIFFICULTY, HASH_BITS},
    ChainError, Hash, Result,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Nonces hashed per rayon job.
const NONCE_CHUNK: u64 = 4_096;
/// Jobs queued per worker thread in each parallel round.
const CHUNKS_PER_WORKER: u64 = 4;

/// Required number of leading zero bits, in `0..=256`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Difficulty(u32);

impl Difficulty {
    pub const ZERO: Difficulty = Difficulty(0);

    pub fn new(bits: u32) -> Result<Self> {
        if bits > HASH_BITS {
            return Err(ChainError::InvalidDifficulty {
                requested: bits,
                max: HASH_BITS,
            });
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(DEFAULT_DIFFICULTY)
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = ChainError;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<Difficulty> for u32 {
    fn from(d: Difficulty) -> u32 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} leading zero bits", self.0)
    }
}

pub fn count_leading_zero_bits(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 8;
        } else {
            total += b.leading_zeros();
            break;
        }
    }
    total
}

pub fn meets_difficulty(hash: &Hash, difficulty: Difficulty) -> bool {
    count_leading_zero_bits(hash) >= difficulty.bits()
}

/// Searches nonces `0..config.nonce_limit` for the lowest one whose header
/// hash meets `config.difficulty`. Returns the sealed header and its hash.
pub fn mine_header(header: BlockHeader, config: &MiningConfig) -> Result<(BlockHeader, Hash)> {
    let difficulty = config.difficulty;
    let found = match config.strategy {
        MiningStrategy::Sequential => search_sequential(header, difficulty, config.nonce_limit),
        MiningStrategy::Parallel => search_parallel(header, difficulty, config.nonce_limit),
    };
    match found {
        Some(nonce) => {
            let sealed = header.with_nonce(nonce);
            debug!(index = sealed.index, nonce, "nonce found");
            Ok((sealed, sealed.hash()))
        }
        None => Err(ChainError::MiningExhausted {
            index: header.index,
            nonce_limit: config.nonce_limit,
            difficulty,
        }),
    }
}

fn search_sequential(header: BlockHeader, difficulty: Difficulty, nonce_limit: u64) -> Option<u64> {
    (0..nonce_limit).find(|nonce| meets_difficulty(&header.with_nonce(*nonce).hash(), difficulty))
}

fn search_parallel(header: BlockHeader, difficulty: Difficulty, nonce_limit: u64) -> Option<u64> {
    search_parallel_by(nonce_limit, |nonce| {
        meets_difficulty(&header.with_nonce(nonce).hash(), difficulty)
    })
}

/// Scans `0..nonce_limit` in rounds of `NONCE_CHUNK`-sized slices, one slice
/// per rayon job, so every worker searches low nonces. `find_map_first`
/// abandons slices above a hit and keeps the lowest winning nonce, which
/// makes the result match the sequential search.
fn search_parallel_by<F>(nonce_limit: u64, hit: F) -> Option<u64>
where
    F: Fn(u64) -> bool + Sync,
{
    let round = NONCE_CHUNK * (rayon::current_num_threads() as u64) * CHUNKS_PER_WORKER;
    let mut start = 0u64;
    while start < nonce_limit {
        let end = start.saturating_add(round).min(nonce_limit);
        let chunks = (end - start).div_ceil(NONCE_CHUNK);
        let found = (0..chunks).into_par_iter().find_map_first(|chunk| {
            let lo = start + chunk * NONCE_CHUNK;
            let hi = lo.saturating_add(NONCE_CHUNK).min(end);
            (lo..hi).find(|nonce| hit(*nonce))
        });
        if found.is_some() {
            return found;
        }
        start = end;
    }
    None
}
