//! End-to-end escrow scenarios across the full job lifecycle.

use haul_core::{AccountId, Amount, ContentRef, MarketError};
use haul_ledger::{EscrowEngine, JobStatus, LedgerEventKind};

fn location() -> ContentRef {
    ContentRef::for_bytes(b"40.7128,-74.0060 -> 40.6782,-73.9442")
}

#[test]
fn marketplace_scenario_point_one_native_at_five_percent() {
    // Poster escrows 0.10 native units at 5% fee; hauler accepts, transits,
    // completes. Hauler gains 0.095, collector 0.005, in one atomic step.
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster = AccountId::new();
    let hauler = AccountId::new();
    let mut engine = EscrowEngine::new(owner, collector, 5).unwrap();

    let tenth = Amount::new(100_000_000_000_000_000);
    let id = engine.create_job(poster, location(), true, tenth).unwrap();
    let job = engine.job(id).unwrap();
    assert_eq!(job.payment, Amount::new(95_000_000_000_000_000));
    assert_eq!(job.fee, Amount::new(5_000_000_000_000_000));
    assert!(job.is_rush);
    assert_eq!(engine.escrow_total(), tenth);

    engine.accept_job(hauler, id).unwrap();
    engine.start_transit(hauler, id).unwrap();
    engine.complete_job(hauler, id).unwrap();

    assert_eq!(engine.balance_of(&hauler), Amount::new(95_000_000_000_000_000));
    assert_eq!(engine.balance_of(&collector), Amount::new(5_000_000_000_000_000));
    assert_eq!(engine.escrow_total(), Amount::ZERO);
}

#[test]
fn dispute_lifecycle_both_outcomes() {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster = AccountId::new();
    let hauler = AccountId::new();
    let mut engine = EscrowEngine::new(owner, collector, 10).unwrap();

    // Outcome A: hauler prevails — terminal Completed, normal payout.
    let a = engine
        .create_job(poster, location(), false, Amount::new(2_000))
        .unwrap();
    engine.accept_job(hauler, a).unwrap();
    engine.start_transit(hauler, a).unwrap();
    engine.dispute_job(poster, a).unwrap();
    engine.resolve_dispute(owner, a, false).unwrap();
    assert_eq!(engine.job(a).unwrap().status, JobStatus::Completed);
    assert_eq!(engine.balance_of(&hauler), Amount::new(1_800));
    assert_eq!(engine.balance_of(&collector), Amount::new(200));

    // Outcome B: poster prevails — terminal Cancelled, full refund.
    let b = engine
        .create_job(poster, location(), false, Amount::new(2_000))
        .unwrap();
    engine.accept_job(hauler, b).unwrap();
    engine.dispute_job(hauler, b).unwrap();
    engine.resolve_dispute(owner, b, true).unwrap();
    assert_eq!(engine.job(b).unwrap().status, JobStatus::Cancelled);
    assert_eq!(engine.balance_of(&poster), Amount::new(2_000));

    // Resolution is terminal: a second resolution attempt must fail.
    assert!(matches!(
        engine.resolve_dispute(owner, b, false),
        Err(MarketError::InvalidState { .. })
    ));
}

#[test]
fn tips_follow_the_outcome() {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster = AccountId::new();
    let hauler = AccountId::new();
    let friend = AccountId::new();
    let mut engine = EscrowEngine::new(owner, collector, 5).unwrap();

    let id = engine
        .create_job(poster, location(), false, Amount::new(1_000))
        .unwrap();
    engine.add_tip(friend, id, Amount::new(100)).unwrap();
    engine.accept_job(hauler, id).unwrap();
    engine.add_tip(poster, id, Amount::new(50)).unwrap();
    assert_eq!(engine.escrow_total(), Amount::new(1_150));

    engine.complete_job(hauler, id).unwrap();
    // payment 950 + tips 150.
    assert_eq!(engine.balance_of(&hauler), Amount::new(1_100));
    assert_eq!(engine.balance_of(&collector), Amount::new(50));
    assert_eq!(engine.escrow_total(), Amount::ZERO);
}

#[test]
fn insertion_ordered_indexes_across_many_jobs() {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster_a = AccountId::new();
    let poster_b = AccountId::new();
    let hauler = AccountId::new();
    let mut engine = EscrowEngine::new(owner, collector, 5).unwrap();

    let mut a_jobs = Vec::new();
    let mut b_jobs = Vec::new();
    for i in 0..5 {
        if i % 2 == 0 {
            a_jobs.push(
                engine
                    .create_job(poster_a, location(), false, Amount::new(500))
                    .unwrap(),
            );
        } else {
            b_jobs.push(
                engine
                    .create_job(poster_b, location(), false, Amount::new(500))
                    .unwrap(),
            );
        }
    }
    assert_eq!(engine.poster_jobs(&poster_a), a_jobs.as_slice());
    assert_eq!(engine.poster_jobs(&poster_b), b_jobs.as_slice());

    for id in a_jobs.iter().chain(&b_jobs) {
        engine.accept_job(hauler, *id).unwrap();
    }
    let expected: Vec<_> = a_jobs.iter().chain(&b_jobs).copied().collect();
    assert_eq!(engine.hauler_jobs(&hauler), expected.as_slice());
}

#[test]
fn event_log_serializes_for_indexers() {
    let owner = AccountId::new();
    let collector = AccountId::new();
    let poster = AccountId::new();
    let mut engine = EscrowEngine::new(owner, collector, 5).unwrap();
    engine
        .create_job(poster, location(), false, Amount::new(1_000))
        .unwrap();

    let json = serde_json::to_string(engine.events()).unwrap();
    assert!(json.contains("JobCreated"));
    assert!(matches!(
        engine.events()[0].kind,
        LedgerEventKind::JobCreated { .. }
    ));
}
