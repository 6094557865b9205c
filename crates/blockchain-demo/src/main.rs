use anyhow::{Context, Result};
use blockchain_core::{ChainConfig, Difficulty, MiningStrategy};
use clap::Parser;
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod display;
mod scenarios;

use scenarios::Scenario;

#[derive(Parser, Debug)]
#[command(name = "blockchain-demo")]
#[command(about = "Mine a small proof-of-work chain and show how tampering is detected")]
struct Cli {
    /// Leading zero bits required in every block hash
    #[arg(long, env = "CHAIN_DIFFICULTY", global = true)]
    difficulty: Option<u32>,
    /// Search nonces on every core
    #[arg(long, global = true)]
    parallel: bool,
    /// Give up on a block after this many nonces
    #[arg(long, global = true)]
    nonce_limit: Option<u64>,
    /// JSON chain configuration, e.g. {"mining": {"difficulty": 12}}
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Blocks mined after genesis
    #[arg(long, default_value_t = 2, global = true)]
    blocks: usize,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Report every fault instead of only the first
    #[arg(long, global = true)]
    all_faults: bool,

    #[command(subcommand)]
    scenario: Option<Scenario>,
}

impl Cli {
    /// Config file first, then flags on top of it.
    fn chain_config(&self) -> Result<ChainConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                ChainConfig::from_json(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ChainConfig::default(),
        };
        if let Some(bits) = self.difficulty {
            config.mining.difficulty = Difficulty::new(bits)?;
        }
        if self.parallel {
            config.mining.strategy = MiningStrategy::Parallel;
        }
        if let Some(limit) = self.nonce_limit {
            config.mining.nonce_limit = limit;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.chain_config()?;
    info!(
        difficulty = config.difficulty().bits(),
        strategy = ?config.mining.strategy,
        blocks = cli.blocks,
        "starting demo"
    );

    let scenario = cli.scenario.unwrap_or(Scenario::All);
    scenarios::check_blocks(scenario, cli.blocks)?;
    let mut outcomes = Vec::new();
    for step in scenario.expand() {
        outcomes.push(scenarios::run(*step, &config, cli.blocks)?);
    }

    if cli.json {
        println!("{}", display::outcomes_json(&outcomes)?);
    } else {
        for outcome in &outcomes {
            display::print_outcome(outcome, cli.all_faults);
        }
    }
    Ok(())
}
