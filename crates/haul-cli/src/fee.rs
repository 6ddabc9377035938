//! # Fee Split Calculator
//!
//! Prints the payment/fee split the ledger would apply at job creation.

use anyhow::Context;
use clap::Args;

use haul_core::Amount;
use haul_ledger::MAX_FEE_PERCENT;

/// Arguments for the `fee` subcommand.
#[derive(Args, Debug)]
pub struct FeeArgs {
    /// Escrow amount in native minor units.
    #[arg(long)]
    pub amount: u128,

    /// Platform fee percent (0..=20).
    #[arg(long, default_value_t = 5)]
    pub percent: u8,
}

/// Compute and print the split.
pub fn run(args: FeeArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.percent <= MAX_FEE_PERCENT,
        "platform fee must be <= {MAX_FEE_PERCENT}%"
    );
    let split = Amount::new(args.amount)
        .fee_split(args.percent)
        .context("fee split failed")?;
    println!("escrow:  {}", args.amount);
    println!("payment: {}", split.payment);
    println!("fee:     {}", split.fee);
    Ok(())
}
