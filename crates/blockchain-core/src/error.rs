use crate::pow::Difficulty;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid difficulty {requested}: at most {max} leading zero bits are possible")]
    InvalidDifficulty { requested: u32, max: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("no nonce below {nonce_limit} gives block {index} a hash with {difficulty}")]
    MiningExhausted {
        index: u64,
        nonce_limit: u64,
        difficulty: Difficulty,
    },
}

pub type Result<T> = std::result::Result<T, ChainError>;
