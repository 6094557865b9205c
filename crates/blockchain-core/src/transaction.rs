use crate::{sha256, unix_now, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value transfer between two parties. Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    receiver: String,
    amount: u64,
    timestamp: u64,
}

impl Transaction {
    /// Creates a transaction stamped with the current time.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: u64) -> Self {
        Self::with_timestamp(sender, receiver, amount, unix_now())
    }

    pub fn with_timestamp(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Canonical encoding hashed into a Merkle leaf. Strings are length
    /// prefixed so that ("ab", "c") and ("a", "bc") encode differently.
    pub fn hash_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(8 + self.sender.len() + 8 + self.receiver.len() + 8 + 8);
        bytes.extend_from_slice(&(self.sender.len() as u64).to_le_bytes());
        bytes.extend_from_slice(self.sender.as_bytes());
        bytes.extend_from_slice(&(self.receiver.len() as u64).to_le_bytes());
        bytes.extend_from_slice(self.receiver.as_bytes());
        bytes.extend_from_slice(&self.amount.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes
    }

    /// Merkle leaf digest of this transaction.
    pub fn hash(&self) -> Hash {
        sha256(self.hash_bytes())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} (at {})",
            self.sender, self.receiver, self.amount, self.timestamp
        )
    }
}
