use crate::{
    config::ChainConfig, constants::ZERO_HASH, pow::Difficulty, validation, Block, Result,
    Transaction, ValidationReport,
};
use serde::Serialize;
use tracing::info;

/// An append-only sequence of mined blocks, always starting with genesis.
#[derive(Clone, Debug, Serialize)]
pub struct Blockchain {
    config: ChainConfig,
    chain: Vec<Block>,
}

impl Blockchain {
    /// A chain holding only a genesis block mined at `difficulty` leading zero bits.
    pub fn create(difficulty: u32) -> Result<Self> {
        Self::with_config(ChainConfig::with_difficulty(difficulty)?)
    }

    pub fn with_config(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let genesis = Block::mine(0, Vec::new(), ZERO_HASH, &config.mining)?;
        info!(
            difficulty = config.difficulty().bits(),
            genesis = %genesis.hash_hex(),
            "blockchain created"
        );
        Ok(Self {
            config,
            chain: vec![genesis],
        })
    }

    /// Mines `transactions` on top of the current tip and appends the block.
    pub fn add_block(&mut self, transactions: Vec<Transaction>) -> Result<&Block> {
        let index = self.chain.len() as u64;
        let previous_hash = self.last_block().hash();
        let block = Block::mine(index, transactions, previous_hash, &self.config.mining)?;
        self.chain.push(block);
        Ok(self.last_block())
    }

    pub fn validate(&self) -> ValidationReport {
        validation::validate_blocks(&self.chain, self.config.difficulty())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn last_block(&self) -> &Block {
        // genesis is pushed at construction and blocks are never removed
        &self.chain[self.chain.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: a chain holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty()
    }

    pub fn total_transactions(&self) -> usize {
        self.chain.iter().map(|b| b.transactions().len()).sum()
    }
}

#[cfg(any(test, feature = "tamper"))]
impl Blockchain {
    /// Mutable access for simulating tampering.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.chain.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pow::count_leading_zero_bits, ChainError, MiningConfig, MiningStrategy, ValidationFault,
    };

    const TEST_DIFFICULTY: u32 = 8;

    fn payments(n: u64) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction::new(format!("sender-{i}"), format!("receiver-{i}"), i * 10))
            .collect()
    }

    fn three_block_chain() -> Blockchain {
        let mut chain = Blockchain::create(TEST_DIFFICULTY).unwrap();
        chain.add_block(payments(2)).unwrap();
        chain.add_block(payments(3)).unwrap();
        chain
    }

    #[test]
    fn genesis_block_example() {
        let chain = Blockchain::create(TEST_DIFFICULTY).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        let genesis = chain.last_block();
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.previous_hash(), ZERO_HASH);
        assert_eq!(genesis.merkle_root(), ZERO_HASH);
        assert!(genesis.transactions().is_empty());
        assert!(count_leading_zero_bits(&genesis.hash()) >= TEST_DIFFICULTY);
    }

    #[test]
    fn fresh_chain_is_valid() {
        let chain = Blockchain::create(TEST_DIFFICULTY).unwrap();
        assert_eq!(chain.validate().as_tuple(), (true, None));
    }

    #[test]
    fn genesis_only_chain_is_valid_at_any_difficulty() {
        for bits in [0, 1, 4, 10] {
            let chain = Blockchain::create(bits).unwrap();
            assert!(chain.validate().is_valid(), "difficulty {bits}");
        }
    }

    #[test]
    fn create_rejects_impossible_difficulty() {
        let err = Blockchain::create(257).unwrap_err();
        assert!(matches!(err, ChainError::InvalidDifficulty { requested: 257, max: 256 }));
    }

    #[test]
    fn with_config_rejects_zero_nonce_limit() {
        let config = ChainConfig {
            mining: MiningConfig::new(Difficulty::ZERO).with_nonce_limit(0),
        };
        assert!(matches!(
            Blockchain::with_config(config),
            Err(ChainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn add_block_links_to_tip() {
        let mut chain = Blockchain::create(TEST_DIFFICULTY).unwrap();
        let genesis_hash = chain.last_block().hash();
        let block = chain.add_block(payments(2)).unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.previous_hash(), genesis_hash);
        assert_eq!(block.recompute_hash(), block.hash());
        assert!(count_leading_zero_bits(&block.hash()) >= TEST_DIFFICULTY);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.total_transactions(), 2);
    }

    #[test]
    fn appended_blocks_keep_chain_valid() {
        let mut chain = Blockchain::create(TEST_DIFFICULTY).unwrap();
        for n in 0..5 {
            chain.add_block(payments(n)).unwrap();
        }
        assert_eq!(chain.len(), 6);
        for (i, block) in chain.blocks().iter().enumerate() {
            assert_eq!(block.index(), i as u64);
        }
        assert_eq!(chain.validate().as_tuple(), (true, None));
    }

    #[test]
    fn validate_is_idempotent() {
        let chain = three_block_chain();
        let first = chain.validate();
        assert_eq!(first, chain.validate());
        assert_eq!(first, chain.validate());
    }

    #[test]
    fn tampered_hash_scenario() {
        let mut chain = three_block_chain();
        let block = chain.block_mut(1).unwrap();
        let mut forged = block.hash();
        forged[5] = forged[5].wrapping_add(1);
        block.tamper_hash(forged);
        assert_eq!(
            chain.validate().as_tuple(),
            (false, Some("Block 1 has been tampered with!".to_string()))
        );
    }

    #[test]
    fn broken_link_scenario() {
        let mut chain = three_block_chain();
        chain.block_mut(2).unwrap().tamper_previous_hash(crate::sha256(b"elsewhere"));
        assert_eq!(
            chain.validate().as_tuple(),
            (
                false,
                Some("Block 2 is not linked correctly to the previous block!".to_string())
            )
        );
    }

    #[test]
    fn tampered_transactions_scenario() {
        let mut chain = three_block_chain();
        chain.block_mut(1).unwrap().tamper_transactions(payments(1));
        let report = chain.validate();
        assert_eq!(report.first_fault(), Some(&ValidationFault::MerkleMismatch { index: 1 }));
    }

    #[test]
    fn parallel_chain_is_valid() {
        let config = ChainConfig {
            mining: MiningConfig::new(Difficulty::new(TEST_DIFFICULTY).unwrap())
                .with_strategy(MiningStrategy::Parallel),
        };
        let mut chain = Blockchain::with_config(config).unwrap();
        chain.add_block(payments(4)).unwrap();
        assert!(chain.validate().is_valid());
        assert_eq!(chain.difficulty().bits(), TEST_DIFFICULTY);
    }

    #[test]
    fn exhausted_mining_leaves_chain_unchanged() {
        let config = ChainConfig {
            mining: MiningConfig::new(Difficulty::ZERO),
        };
        let mut chain = Blockchain::with_config(config).unwrap();
        chain.config.mining = MiningConfig::new(Difficulty::new(64).unwrap()).with_nonce_limit(4);
        let err = chain.add_block(payments(1)).unwrap_err();
        assert!(matches!(err, ChainError::MiningExhausted { index: 1, .. }));
        assert_eq!(chain.len(), 1);
    }
}
