//! ipagg - IP range aggregation and selection reduction
//!
//! Summarizes per-address activity into covering CIDR ranges and trims
//! selections of accounts, addresses and ranges before bulk actions.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ipagg::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Aggregate { file, format, top } => {
            ipagg::commands::aggregate::run(&file, format.as_deref(), top, &cli.config)
        }
        Commands::Reduce { entries } => ipagg::commands::reduce::run(&entries),
        Commands::Categorize { entries, format } => {
            ipagg::commands::categorize::run(&entries, format.as_deref(), &cli.config)
        }
        Commands::Init { force } => ipagg::commands::init::run(force, &cli.config),
        Commands::Version => {
            println!("ipagg {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
