use blockchain_core::{Blockchain, Transaction};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const TEST_DIFFICULTY: u32 = 8;

const NAMES: [&str; 6] = ["Alice", "Bob", "Charlie", "Dave", "Erin", "Frank"];

/// `count` pseudo-random transfers, reproducible for a given `seed`.
pub fn random_transactions(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let sender = NAMES[rng.gen_range(0..NAMES.len())];
            let receiver = NAMES[rng.gen_range(0..NAMES.len())];
            Transaction::with_timestamp(
                sender,
                receiver,
                rng.gen_range(1..10_000),
                rng.gen_range(1_600_000_000..1_700_000_000),
            )
        })
        .collect()
}

/// Genesis plus `blocks` mined blocks of random transactions.
pub fn build_chain(blocks: usize) -> Blockchain {
    let mut chain = Blockchain::create(TEST_DIFFICULTY).expect("valid difficulty");
    for i in 0..blocks {
        chain
            .add_block(random_transactions(i as u64, i % 4 + 1))
            .expect("mining at test difficulty succeeds");
    }
    chain
}
