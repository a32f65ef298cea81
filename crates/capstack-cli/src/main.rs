//! Capstack CLI - Command-line interface for debt tranche allocation.
//!
//! # Usage
//!
//! ```bash
//! # Recommend an allocation across every tranche in a model file
//! capstack recommend --input model.json
//!
//! # Optimize a subset of tranches from inline inputs
//! capstack optimize --cash-flows 100000,120000 --rate senior=0.05 --rate mezzanine=0.10 \
//!     --types senior,mezzanine
//!
//! # Worst-period coverage of a single debt amount
//! capstack simulate --input flows.csv --rate senior=0.05 --amount 1000000 --debt-type senior
//!
//! # Recommend for several models in parallel
//! capstack --format json batch deal_a.yaml deal_b.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Recommend(args) => commands::recommend::execute(args, format, quiet)?,
        Commands::Optimize(args) => commands::optimize::execute(args, format, quiet)?,
        Commands::Simulate(args) => commands::simulate::execute(args, format, quiet)?,
        Commands::Batch(args) => commands::batch::execute(args, format, quiet)?,
    }

    Ok(())
}

/// Installs a stderr subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
