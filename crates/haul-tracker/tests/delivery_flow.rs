//! Tracker against the real escrow ledger: assignment gating, the full
//! delivery trail, and ledger/tracker lifecycle interplay.

use haul_core::{AccountId, Amount, ContentRef, MarketError};
use haul_ledger::{EscrowEngine, SharedLedger};
use haul_tracker::{DeliveryStatus, DeliveryTracker};

struct World {
    ledger: SharedLedger,
    tracker: DeliveryTracker<SharedLedger>,
    poster: AccountId,
    hauler: AccountId,
}

fn world() -> World {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let engine = EscrowEngine::new(owner, collector, 5).unwrap();
    let ledger = SharedLedger::new(engine);
    let tracker = DeliveryTracker::new(owner, AccountId::new(), ledger.clone());
    World {
        ledger,
        tracker,
        poster: AccountId::new(),
        hauler: AccountId::new(),
    }
}

fn geo(tag: &str) -> ContentRef {
    ContentRef::new(format!("geo:{tag}")).unwrap()
}

fn proof(tag: &str) -> ContentRef {
    ContentRef::new(format!("proof:{tag}")).unwrap()
}

#[test]
fn trail_is_gated_by_ledger_assignment() {
    let mut w = world();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(1_000))
        .unwrap();

    // Before acceptance there is no assigned hauler.
    let result = w.tracker.start_delivery(w.hauler, job, geo("start"));
    assert!(matches!(result, Err(MarketError::Unauthorized { .. })));

    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();
    w.tracker.start_delivery(w.hauler, job, geo("start")).unwrap();

    // A different hauler still cannot write the trail.
    let impostor = AccountId::new();
    let result = w.tracker.update_location(impostor, job, geo("x"), 90, "");
    assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
}

#[test]
fn full_delivery_mirrors_ledger_completion() {
    let mut w = world();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(10_000))
        .unwrap();
    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();
    w.ledger.borrow_mut().start_transit(w.hauler, job).unwrap();

    w.tracker.start_delivery(w.hauler, job, geo("depot")).unwrap();
    w.tracker
        .update_location(w.hauler, job, geo("highway"), 85, "on the road")
        .unwrap();
    w.tracker
        .confirm_pickup(w.hauler, job, geo("origin"), proof("photo-1"), "loaded")
        .unwrap();
    w.tracker
        .arrive_at_dropoff(w.hauler, job, geo("dest"), proof("photo-2"), "arrived")
        .unwrap();
    w.tracker
        .complete_delivery(w.hauler, job, geo("dest"), proof("signature"), "handed over")
        .unwrap();
    assert_eq!(
        w.tracker.current_status(job).unwrap(),
        DeliveryStatus::Delivered
    );

    // Proof is in; the hauler claims the escrow.
    w.ledger.borrow_mut().complete_job(w.hauler, job).unwrap();
    assert_eq!(
        w.ledger.borrow().balance_of(&w.hauler),
        Amount::new(9_500)
    );
}

#[test]
fn trail_survives_ledger_terminal_states() {
    // The trail remains queryable after the job closes on the ledger side.
    let mut w = world();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(1_000))
        .unwrap();
    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();
    w.tracker.start_delivery(w.hauler, job, geo("start")).unwrap();
    w.ledger.borrow_mut().complete_job(w.hauler, job).unwrap();

    assert_eq!(w.tracker.location_update_count(job).unwrap(), 1);
    assert_eq!(
        w.tracker.current_status(job).unwrap(),
        DeliveryStatus::InTransit
    );
}

#[test]
fn trail_writes_close_with_the_ledger_job() {
    let mut w = world();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(1_000))
        .unwrap();
    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();
    w.tracker.start_delivery(w.hauler, job, geo("start")).unwrap();
    w.ledger.borrow_mut().complete_job(w.hauler, job).unwrap();

    let result = w.tracker.update_location(w.hauler, job, geo("late"), 40, "");
    assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    assert_eq!(w.tracker.location_update_count(job).unwrap(), 1);
}

#[test]
fn abandoned_job_fails_straight_from_not_started() {
    let mut w = world();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(1_000))
        .unwrap();
    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();
    assert_eq!(
        w.tracker.current_status(job).unwrap(),
        DeliveryStatus::NotStarted
    );

    w.tracker
        .report_failed_delivery(w.hauler, job, geo("depot"), proof("none"), "never departed")
        .unwrap();
    assert_eq!(
        w.tracker.current_status(job).unwrap(),
        DeliveryStatus::Failed
    );
    assert_eq!(w.tracker.milestone_count(job).unwrap(), 1);
    assert_eq!(w.tracker.location_update_count(job).unwrap(), 0);
}

#[test]
fn unknown_job_is_not_found_everywhere() {
    let w = world();
    assert!(matches!(
        w.tracker.current_status(haul_core::JobId(42)),
        Err(MarketError::NotFound { .. })
    ));
}

#[test]
fn owner_may_repoint_tracker_at_replacement_ledger() {
    let mut w = world();
    let owner = w.ledger.borrow().owner();
    let job = w
        .ledger
        .borrow_mut()
        .create_job(w.poster, geo("route"), false, Amount::new(1_000))
        .unwrap();
    w.ledger.borrow_mut().accept_job(w.hauler, job).unwrap();

    // A replacement ledger that knows nothing about the job.
    let replacement = SharedLedger::new(
        EscrowEngine::new(AccountId::new(), AccountId::new(), 5).unwrap(),
    );
    assert!(w
        .tracker
        .update_directory(w.hauler, replacement.clone())
        .is_err());
    w.tracker.update_directory(owner, replacement).unwrap();

    let result = w.tracker.start_delivery(w.hauler, job, geo("start"));
    assert!(matches!(result, Err(MarketError::NotFound { .. })));
}
