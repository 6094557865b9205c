//! Structural validation of a block sequence.
//!
//! Every block is checked, in index order, for:
//! 1. hash self-consistency,
//! 2. linkage to the predecessor's stored hash (skipped for genesis),
//! 3. Merkle root against its transactions,
//! 4. index against its position,
//! 5. proof-of-work (skipped for genesis and for blocks that already failed 1).
//!
//! A block whose stored hash matches its header once `previous_hash` is put
//! back to the predecessor's hash has had only its link rewritten, so it is
//! reported as a linkage fault instead of a tampered block.

use crate::{
    pow::{meets_difficulty, Difficulty},
    Block,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFault {
    Tampered { index: u64 },
    BrokenLink { index: u64 },
    MerkleMismatch { index: u64 },
    IndexMismatch { index: u64, found: u64 },
    InsufficientWork { index: u64 },
}

impl ValidationFault {
    /// Position of the faulty block in the chain.
    pub fn index(&self) -> u64 {
        match *self {
            ValidationFault::Tampered { index }
            | ValidationFault::BrokenLink { index }
            | ValidationFault::MerkleMismatch { index }
            | ValidationFault::IndexMismatch { index, .. }
            | ValidationFault::InsufficientWork { index } => index,
        }
    }
}

impl fmt::Display for ValidationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFault::Tampered { index } => {
                write!(f, "Block {index} has been tampered with!")
            }
            ValidationFault::BrokenLink { index } => {
                write!(f, "Block {index} is not linked correctly to the previous block!")
            }
            ValidationFault::MerkleMismatch { index } => {
                write!(f, "Block {index} transactions do not match its merkle root!")
            }
            ValidationFault::IndexMismatch { index, found } => {
                write!(f, "Block {index} has index {found}, expected {index}!")
            }
            ValidationFault::InsufficientWork { index } => {
                write!(f, "Block {index} does not satisfy the proof-of-work difficulty!")
            }
        }
    }
}

/// Outcome of a validation pass: every fault found, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    faults: Vec<ValidationFault>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn first_fault(&self) -> Option<&ValidationFault> {
        self.faults.first()
    }

    pub fn faults(&self) -> &[ValidationFault] {
        &self.faults
    }

    /// `(valid, description of the first fault)`.
    pub fn as_tuple(&self) -> (bool, Option<String>) {
        (self.is_valid(), self.first_fault().map(ToString::to_string))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_fault() {
            None => write!(f, "Blockchain is valid."),
            Some(fault) => write!(f, "{fault}"),
        }
    }
}

pub fn validate_blocks(blocks: &[Block], difficulty: Difficulty) -> ValidationReport {
    let mut faults = Vec::new();
    for (position, block) in blocks.iter().enumerate() {
        let previous = position.checked_sub(1).map(|p| &blocks[p]);
        let before = faults.len();
        check_block(position as u64, block, previous, difficulty, &mut faults);
        if faults.len() == before {
            debug!(index = position, "block ok");
        }
    }
    for fault in &faults {
        warn!(index = fault.index(), "{fault}");
    }
    ValidationReport { faults }
}

fn check_block(
    position: u64,
    block: &Block,
    previous: Option<&Block>,
    difficulty: Difficulty,
    faults: &mut Vec<ValidationFault>,
) {
    let consistent = block.is_hash_consistent();
    let mut link_reported = false;

    if !consistent {
        let only_link_rewritten = previous.is_some_and(|prev| {
            let mut original = *block.header();
            original.previous_hash = prev.hash();
            original.hash() == block.hash()
        });
        if only_link_rewritten {
            faults.push(ValidationFault::BrokenLink { index: position });
            link_reported = true;
        } else {
            faults.push(ValidationFault::Tampered { index: position });
        }
    }

    if let Some(prev) = previous {
        if !link_reported && block.previous_hash() != prev.hash() {
            faults.push(ValidationFault::BrokenLink { index: position });
        }
    }

    if block.recompute_merkle_root() != block.merkle_root() {
        faults.push(ValidationFault::MerkleMismatch { index: position });
    }

    if block.index() != position {
        faults.push(ValidationFault::IndexMismatch {
            index: position,
            found: block.index(),
        });
    }

    if consistent && previous.is_some() && !meets_difficulty(&block.hash(), difficulty) {
        faults.push(ValidationFault::InsufficientWork { index: position });
    }
}
