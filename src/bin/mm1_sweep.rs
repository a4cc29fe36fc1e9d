//! M/M/1 sweep runner
//!
//! Reads a `QueueSweepConfig` from the JSON file given as the only argument
//! and prints one JSON line per (lambda, mu) result.

use queuesim::{QueueSweepConfig, SimulationManager};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: mm1_sweep <config.json>");
        std::process::exit(1);
    }

    let config = QueueSweepConfig::from_json_file(&args[1])?;
    let manager = SimulationManager::new(&config.execution)?;
    log::info!("Base seed {}", manager.executor().base_seed());

    let results = manager.run_queue(&config)?;
    for result in results.values() {
        println!("{}", serde_json::to_string(result)?);
    }

    Ok(())
}
