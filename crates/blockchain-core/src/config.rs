use crate::{pow::Difficulty, ChainError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningStrategy {
    /// One nonce at a time on the calling thread.
    #[default]
    Sequential,
    /// Nonce range split across the rayon thread pool.
    Parallel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub difficulty: Difficulty,
    pub strategy: MiningStrategy,
    /// Nonces in `0..nonce_limit` are tried before mining gives up.
    pub nonce_limit: u64,
}

impl MiningConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: MiningStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_nonce_limit(mut self, nonce_limit: u64) -> Self {
        self.nonce_limit = nonce_limit;
        self
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            strategy: MiningStrategy::default(),
            nonce_limit: u64::MAX,
        }
    }
}

/// Settings a [`crate::Blockchain`] is created with and mines every block under.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub mining: MiningConfig,
}

impl ChainConfig {
    pub fn with_difficulty(bits: u32) -> Result<Self> {
        Ok(Self {
            mining: MiningConfig::new(Difficulty::new(bits)?),
        })
    }

    /// Parses and validates a JSON document such as
    /// `{"mining": {"difficulty": 12, "strategy": "parallel"}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.mining.difficulty
    }

    pub fn validate(&self) -> Result<()> {
        if self.mining.nonce_limit == 0 {
            return Err(ChainError::InvalidConfig(
                "mining.nonce_limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
