// SPDX-License-Identifier: MIT

use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use halving_reduce::render::{render_sequence, LogObserver, PrintObserver};
use halving_reduce::{ReduceConfig, RoundCoordinator, Sequence, StandardPool};

/// Sum `1..=N` by repeated in-place halving on a thread pool.
#[derive(Parser, Debug)]
#[command(name = "halving-reduce", version, about)]
struct Cli {
    /// Length of the generated sequence
    #[arg(long, default_value_t = 1000)]
    elements: usize,

    /// Wave tasks per round
    #[arg(long, default_value_t = 5)]
    workers: usize,

    /// Pool threads [default: available parallelism]
    #[arg(long)]
    threads: Option<usize>,

    /// Grace period, in seconds, for each pool shutdown phase
    #[arg(long, default_value_t = 60)]
    shutdown_grace_secs: u64,

    /// Do not print the sequence after every round
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> ReduceConfig {
        let defaults = ReduceConfig::default();
        ReduceConfig {
            elements: self.elements,
            workers: self.workers,
            threads: self.threads.unwrap_or(defaults.threads),
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
            print_rounds: !self.quiet,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = Cli::parse().into_config();
    config.validate().context("invalid arguments")?;
    info!(
        "reducing {} elements with {} workers on {} threads",
        config.elements, config.workers, config.threads
    );

    let mut pool = StandardPool::new(config.threads).context("failed to start thread pool")?;
    let sequence = Sequence::ascending(config.elements);

    if config.print_rounds {
        println!("Initial array:");
        println!("{}", render_sequence(&sequence.snapshot()));
    }

    let start_time = Instant::now();
    let reduction = {
        let coordinator = RoundCoordinator::new(&pool, config.workers)?;
        let mut coordinator = if config.print_rounds {
            println!("Reducing with {} workers:", config.workers);
            coordinator.with_observer(Box::new(PrintObserver::new(io::stdout())))
        } else {
            coordinator.with_observer(Box::new(LogObserver))
        };
        coordinator.reduce(&sequence).context("reduction failed")?
    };
    let elapsed_ms = start_time.elapsed().as_millis();

    println!("Reduction took {elapsed_ms} milliseconds");
    println!("Result: {}", reduction.total);
    info!("{} rounds", reduction.rounds);

    // The result is already valid; a slow shutdown is only a diagnostic.
    if let Err(err) = pool.shutdown(config.shutdown_grace) {
        warn!("thread pool did not shut down cleanly: {err}");
    }
    Ok(())
}
