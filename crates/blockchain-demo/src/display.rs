use crate::scenarios::Outcome;
use anyhow::Result;
use blockchain_core::Block;
use serde_json::json;

pub fn print_block(block: &Block) {
    println!("Block #{}", block.index());
    println!("  Timestamp:     {}", block.timestamp());
    println!("  Transactions:  {}", block.transactions().len());
    for tx in block.transactions() {
        println!("    - {tx}");
    }
    println!("  Merkle root:   {}", block.merkle_root_hex());
    println!("  Previous hash: {}", block.previous_hash_hex());
    println!("  Nonce:         {}", block.nonce());
    println!("  Hash:          {}", block.hash_hex());
}

pub fn print_outcome(outcome: &Outcome, all_faults: bool) {
    println!("=== {} ===", outcome.scenario.title());
    for block in outcome.chain.blocks() {
        print_block(block);
    }
    println!();
    if all_faults && !outcome.report.is_valid() {
        for fault in outcome.report.faults() {
            println!("{fault}");
        }
    } else {
        println!("{}", outcome.report);
    }
    println!();
}

pub fn outcomes_json(outcomes: &[Outcome]) -> Result<String> {
    let values: Vec<_> = outcomes
        .iter()
        .map(|o| {
            json!({
                "scenario": o.scenario.title(),
                "valid": o.report.is_valid(),
                "message": o.report.to_string(),
                "faults": o.report.faults(),
                "chain": o.chain,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&values)?)
}
