use anyhow::{ensure, Context, Result};
use blockchain_core::{sha256, Blockchain, ChainConfig, Transaction, ValidationReport};
use clap::Subcommand;

const PARTIES: [&str; 4] = ["Alice", "Bob", "Charlie", "Dave"];

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Valid, tamper-hash and break-link in turn
    All,
    /// Mine a chain and validate it untouched
    Valid,
    /// Overwrite block 1's stored hash
    TamperHash,
    /// Overwrite block 2's stored previous hash
    BreakLink,
    /// Swap block 1's transactions without re-mining
    TamperTransactions,
}

impl Scenario {
    pub fn expand(self) -> &'static [Scenario] {
        match self {
            Scenario::All => &[Scenario::Valid, Scenario::TamperHash, Scenario::BreakLink],
            Scenario::Valid => &[Scenario::Valid],
            Scenario::TamperHash => &[Scenario::TamperHash],
            Scenario::BreakLink => &[Scenario::BreakLink],
            Scenario::TamperTransactions => &[Scenario::TamperTransactions],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Scenario::All => "All scenarios",
            Scenario::Valid => "Valid chain",
            Scenario::TamperHash => "Tampered block hash",
            Scenario::BreakLink => "Broken block link",
            Scenario::TamperTransactions => "Tampered transactions",
        }
    }

    /// Highest block index the scenario modifies.
    fn target(self) -> Option<usize> {
        match self {
            Scenario::TamperHash | Scenario::TamperTransactions => Some(1),
            Scenario::BreakLink => Some(2),
            Scenario::All | Scenario::Valid => None,
        }
    }
}

pub struct Outcome {
    pub scenario: Scenario,
    pub chain: Blockchain,
    pub report: ValidationReport,
}

/// Four transfers per block, rotating through the parties.
pub fn sample_transactions(round: usize) -> Vec<Transaction> {
    (0..4)
        .map(|i| {
            let sender = PARTIES[(round + i) % PARTIES.len()];
            let receiver = PARTIES[(round + i + 1) % PARTIES.len()];
            Transaction::new(sender, receiver, ((round * 4 + i) as u64 + 1) * 5)
        })
        .collect()
}

pub fn build_chain(config: &ChainConfig, blocks: usize) -> Result<Blockchain> {
    let mut chain = Blockchain::with_config(config.clone())?;
    for round in 0..blocks {
        chain
            .add_block(sample_transactions(round))
            .with_context(|| format!("mining block {}", round + 1))?;
    }
    Ok(chain)
}

/// Fails unless every step of `scenario` has a block to modify.
pub fn check_blocks(scenario: Scenario, blocks: usize) -> Result<()> {
    for step in scenario.expand() {
        if let Some(target) = step.target() {
            ensure!(
                blocks >= target,
                "the {} scenario needs at least {target} blocks after genesis (got --blocks {blocks})",
                step.title().to_lowercase()
            );
        }
    }
    Ok(())
}

pub fn run(scenario: Scenario, config: &ChainConfig, blocks: usize) -> Result<Outcome> {
    check_blocks(scenario, blocks)?;
    let mut chain = build_chain(config, blocks)?;
    tamper(scenario, &mut chain);
    let report = chain.validate();
    Ok(Outcome {
        scenario,
        chain,
        report,
    })
}

fn tamper(scenario: Scenario, chain: &mut Blockchain) {
    let Some(block) = scenario.target().and_then(|i| chain.block_mut(i)) else {
        return;
    };
    match scenario {
        Scenario::TamperHash => block.tamper_hash(sha256(b"forged block hash")),
        Scenario::BreakLink => block.tamper_previous_hash(sha256(b"forged previous hash")),
        Scenario::TamperTransactions => block.tamper_transactions(vec![Transaction::new(
            "Mallory",
            "Mallory",
            1_000_000,
        )]),
        Scenario::All | Scenario::Valid => {}
    }
}
