//! # haulhub CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// HaulHub core CLI.
///
/// Exercises the escrow ledger, delivery tracker, and badge issuer from
/// the command line.
#[derive(Parser, Debug)]
#[command(name = "haulhub", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the full escrow/delivery/badge demo scenario.
    Demo(haul_cli::demo::DemoArgs),
    /// Compute the payment/fee split for an escrow amount.
    Fee(haul_cli::fee::FeeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => haul_cli::demo::run(args),
        Commands::Fee(args) => haul_cli::fee::run(args),
    }
}
