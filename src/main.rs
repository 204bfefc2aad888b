mod block;
mod config;
mod error;
mod size;
mod toucher;

use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use env_logger::Env;
use log::{debug, error, log_enabled, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::block::Block;
use crate::config::RunConfig;
use crate::size::ByteSize;
use crate::toucher::touch_pages;

/// Seed of a generator nobody seeded yet; the boundary writes use it.
const INITIAL_SEED: u64 = 1;

fn main() -> ExitCode {
    // Initialize logger from environment variables
    // Use RUST_LOG=debug to see allocation details, RUST_LOG=trace for every pass
    // Example: RUST_LOG=debug ./pagetouch 1073741824 10
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            println!("Failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let config = RunConfig::from_args(args)?;
    debug!("Configuration: {:?}", config);

    let size = ByteSize(config.blocksize.get());
    println!("Trying to allocate {}", size);
    let mut block = Block::allocate(config.blocksize)?;

    println!("Accessing data pages...");
    block.touch_ends(&mut StdRng::seed_from_u64(INITIAL_SEED));

    let started = Instant::now();
    let mut rng = StdRng::seed_from_u64(wall_clock_seed());
    debug!("Touching {} for {:?}", size, config.runtime);
    let stats = touch_pages(&mut block, &mut rng, || started.elapsed() < config.runtime);

    debug!(
        "Done after {:.2?}: {} passes, {} writes",
        started.elapsed(),
        stats.passes,
        stats.writes
    );
    if log_enabled!(log::Level::Trace) {
        trace!("Final granularity {}", stats.granularity);
    }

    drop(block);
    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
