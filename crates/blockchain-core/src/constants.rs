use crate::Hash;

pub const BYTE: usize = 8;
pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// Upper bound for a difficulty expressed in leading zero bits.
pub const HASH_BITS: u32 = (HASH_SIZE * BYTE) as u32;
/// Previous-hash sentinel of the genesis block, and the Merkle root of an empty block.
pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];
/// index + timestamp + merkle_root + previous_hash + nonce
pub const HEADER_BYTES: usize = 8 + 8 + HASH_SIZE + HASH_SIZE + 8;
pub const DEFAULT_DIFFICULTY: u32 = 16;
