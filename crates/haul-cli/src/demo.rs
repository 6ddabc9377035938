//! # Demo Scenario
//!
//! Drives one complete marketplace lifecycle through the real engines:
//! escrow at 5%, acceptance, the full delivery trail, atomic payout, and a
//! badge mint for the hauler. Verifies the documented balances at each
//! step and prints the combined event logs.

use anyhow::Context;
use clap::Args;
use tracing::info;

use haul_badge::{BadgeIssuer, BadgeType};
use haul_core::{AccountId, Amount, ContentRef};
use haul_ledger::{EscrowEngine, SharedLedger};
use haul_tracker::DeliveryTracker;

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Escrow amount in native minor units.
    #[arg(long, default_value_t = 100_000_000_000_000_000)]
    pub amount: u128,

    /// Platform fee percent (0..=20).
    #[arg(long, default_value_t = 5)]
    pub fee_percent: u8,

    /// Print the full event logs as JSON when done.
    #[arg(long)]
    pub events: bool,
}

/// Run the scenario.
pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster = AccountId::new();
    let hauler = AccountId::new();

    let engine = EscrowEngine::new(owner, collector, args.fee_percent)
        .context("engine construction failed")?;
    let ledger = SharedLedger::new(engine);
    let mut tracker = DeliveryTracker::new(owner, AccountId::new(), ledger.clone());
    let mut issuer = BadgeIssuer::new(owner);
    issuer.add_issuer(owner, owner).context("allow-list setup failed")?;

    // Poster escrows the job.
    let route = ContentRef::for_bytes(b"40.7128,-74.0060 -> 40.6782,-73.9442");
    let job = ledger
        .borrow_mut()
        .create_job(poster, route, true, Amount::new(args.amount))
        .context("job creation failed")?;
    {
        let engine = ledger.borrow();
        let details = engine.job(job)?;
        info!(%job, payment = %details.payment, fee = %details.fee, "job escrowed");
    }

    // Hauler accepts and drives the delivery trail.
    ledger.borrow_mut().accept_job(hauler, job)?;
    ledger.borrow_mut().start_transit(hauler, job)?;
    info!(%job, %hauler, "job accepted, transit started");

    tracker.start_delivery(hauler, job, ContentRef::for_bytes(b"depot"))?;
    tracker.update_location(hauler, job, ContentRef::for_bytes(b"i-278"), 87, "on the road")?;
    tracker.confirm_pickup(
        hauler,
        job,
        ContentRef::for_bytes(b"origin"),
        ContentRef::for_bytes(b"pickup-photo"),
        "package loaded",
    )?;
    tracker.arrive_at_dropoff(
        hauler,
        job,
        ContentRef::for_bytes(b"destination"),
        ContentRef::for_bytes(b"door-photo"),
        "at the door",
    )?;
    tracker.complete_delivery(
        hauler,
        job,
        ContentRef::for_bytes(b"destination"),
        ContentRef::for_bytes(b"recipient-signature"),
        "signed for",
    )?;
    let status = tracker.current_status(job)?;
    info!(%job, %status, "delivery trail complete");

    // Payout is atomic: payment to the hauler, fee to the collector.
    ledger.borrow_mut().complete_job(hauler, job)?;
    let (hauler_balance, collector_balance) = {
        let engine = ledger.borrow();
        (engine.balance_of(&hauler), engine.balance_of(&collector))
    };
    info!(%hauler_balance, %collector_balance, "escrow released");

    let expected = Amount::new(args.amount)
        .fee_split(args.fee_percent)
        .context("fee split failed")?;
    anyhow::ensure!(hauler_balance == expected.payment, "hauler payout mismatch");
    anyhow::ensure!(collector_balance == expected.fee, "fee payout mismatch");

    // First completed delivery earns a badge.
    let token = issuer.issue_badge(
        owner,
        hauler,
        BadgeType::FrequentHauler,
        1,
        "https://badges.microsendr.example/frequent/1",
    )?;
    info!(%token, "badge minted");

    if args.events {
        println!("{}", serde_json::to_string_pretty(ledger.borrow().events())?);
        println!("{}", serde_json::to_string_pretty(tracker.events())?);
        println!("{}", serde_json::to_string_pretty(issuer.events())?);
    }
    Ok(())
}
