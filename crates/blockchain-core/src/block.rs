use crate::{
    config::MiningConfig, constants::HEADER_BYTES, merkle_root, pow, sha256, unix_now, Hash,
    Result, Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The hashed part of a block. The transactions enter only through `merkle_root`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub index: u64,
    pub timestamp: u64,
    #[serde(with = "hex::serde")]
    pub merkle_root: Hash,
    #[serde(with = "hex::serde")]
    pub previous_hash: Hash,
    pub nonce: u64,
}

impl BlockHeader {
    pub fn new(index: u64, timestamp: u64, merkle_root: Hash, previous_hash: Hash) -> Self {
        Self {
            index,
            timestamp,
            merkle_root,
            previous_hash,
            nonce: 0,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn hash_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut bytes = [0u8; HEADER_BYTES];
        bytes[0..8].copy_from_slice(&self.index.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[16..48].copy_from_slice(&self.merkle_root);
        bytes[48..80].copy_from_slice(&self.previous_hash);
        bytes[80..88].copy_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    pub fn hash(&self) -> Hash {
        sha256(self.hash_bytes())
    }
}

/// A mined block.
///
/// [`Block::mine`] is the only constructor that guarantees the stored hash
/// matches the header. Deserialization is the load path for blocks produced
/// elsewhere: it accepts whatever fields it is given, so a loaded block is
/// untrusted until [`crate::validation::validate_blocks`] (or
/// [`Block::is_hash_consistent`]) has checked it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Transaction>,
    #[serde(with = "hex::serde")]
    hash: Hash,
}

impl Block {
    /// Computes the Merkle root, stamps the current time and searches for a
    /// nonce meeting `config.difficulty`.
    pub fn mine(
        index: u64,
        transactions: Vec<Transaction>,
        previous_hash: Hash,
        config: &MiningConfig,
    ) -> Result<Self> {
        Self::mine_at(index, unix_now(), transactions, previous_hash, config)
    }

    /// [`Block::mine`] with a caller-chosen timestamp.
    pub fn mine_at(
        index: u64,
        timestamp: u64,
        transactions: Vec<Transaction>,
        previous_hash: Hash,
        config: &MiningConfig,
    ) -> Result<Self> {
        let header = BlockHeader::new(index, timestamp, merkle_root(&transactions), previous_hash);
        let (header, hash) = pow::mine_header(header, config)?;
        info!(
            index,
            nonce = header.nonce,
            txs = transactions.len(),
            hash = %hex::encode(hash),
            "mined block"
        );
        Ok(Self {
            header,
            transactions,
            hash,
        })
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn merkle_root(&self) -> Hash {
        self.header.merkle_root
    }

    pub fn previous_hash(&self) -> Hash {
        self.header.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce
    }

    /// The stored hash, as recorded when the block was mined.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn previous_hash_hex(&self) -> String {
        hex::encode(self.header.previous_hash)
    }

    pub fn merkle_root_hex(&self) -> String {
        hex::encode(self.header.merkle_root)
    }

    /// Hash derived from the stored header fields, ignoring the stored hash.
    pub fn recompute_hash(&self) -> Hash {
        self.header.hash()
    }

    /// Merkle root derived from the stored transactions.
    pub fn recompute_merkle_root(&self) -> Hash {
        merkle_root(&self.transactions)
    }

    pub fn is_hash_consistent(&self) -> bool {
        self.recompute_hash() == self.hash
    }
}

/// Field overwrites that bypass mining, for simulating an attacker.
#[cfg(any(test, feature = "tamper"))]
impl Block {
    pub fn tamper_hash(&mut self, hash: Hash) {
        self.hash = hash;
    }

    pub fn tamper_previous_hash(&mut self, previous_hash: Hash) {
        self.header.previous_hash = previous_hash;
    }

    pub fn tamper_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    pub fn tamper_index(&mut self, index: u64) {
        self.header.index = index;
    }

    pub fn tamper_nonce(&mut self, nonce: u64) {
        self.header.nonce = nonce;
    }
}
