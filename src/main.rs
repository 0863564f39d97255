//! Escrow Ledger CLI
//!
//! Replays a marketplace escrow command log and writes the final ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > transactions.csv
//! cargo run -- --report parties commands.csv > parties.csv
//! cargo run -- --strategy sync -vv commands.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr. `RUST_LOG` overrides the
//! level chosen by `-v`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output failure)

use escrow_ledger::cli;
use escrow_ledger::io::write_report;
use escrow_ledger::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let result = strategy
        .process(&args.input_file)
        .and_then(|snapshot| write_report(&snapshot, args.report, &mut std::io::stdout()));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
