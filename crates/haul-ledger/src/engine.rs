//! # Escrow Engine
//!
//! Custody of job funds and authoritative job status. One engine owns the
//! whole job registry: records, per-identity indexes, the balance sheet,
//! and the event log. Every operation takes the caller's identity
//! explicitly — the engine compares identities, it never authenticates them.
//!
//! ## Atomicity
//!
//! Every operation validates fully before its first write. Money-moving
//! transitions stage all credits and apply them in one step; an error
//! anywhere aborts with no balance change, no status change, and no event.
//!
//! ## Serialization of operations
//!
//! The engine is a plain `&mut self` state machine. The embedding layer
//! provides the total order of operations (the original substrate applied
//! one transaction fully before the next). `SharedLedger` wraps the engine
//! for single-threaded shared access so the delivery tracker can hold a
//! read-only view.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use haul_core::{
    AccountId, Amount, ContentRef, JobAssignment, JobDirectory, JobId, MarketError, Timestamp,
};

use crate::balances::BalanceSheet;
use crate::event::{LedgerEvent, LedgerEventKind};
use crate::job::{Job, JobStatus};

/// Platform fee ceiling, in percent.
pub const MAX_FEE_PERCENT: u8 = 20;

/// A single tip contribution, remembered so refund paths can return each
/// tip to the party that added it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipContribution {
    /// Who added the tip.
    pub from: AccountId,
    /// How much was added.
    pub amount: Amount,
}

/// The escrow ledger engine.
#[derive(Debug)]
pub struct EscrowEngine {
    owner: AccountId,
    fee_collector: AccountId,
    fee_percent: u8,
    next_job_id: u64,
    jobs: BTreeMap<JobId, Job>,
    poster_index: BTreeMap<AccountId, Vec<JobId>>,
    hauler_index: BTreeMap<AccountId, Vec<JobId>>,
    tip_ledger: BTreeMap<JobId, Vec<TipContribution>>,
    balances: BalanceSheet,
    escrow_total: Amount,
    events: Vec<LedgerEvent>,
}

impl EscrowEngine {
    /// Create an engine with the given owner, fee collector, and platform
    /// fee percent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `fee_percent` exceeds [`MAX_FEE_PERCENT`].
    pub fn new(
        owner: AccountId,
        fee_collector: AccountId,
        fee_percent: u8,
    ) -> Result<Self, MarketError> {
        require_fee_percent(fee_percent)?;
        Ok(Self {
            owner,
            fee_collector,
            fee_percent,
            next_job_id: 1,
            jobs: BTreeMap::new(),
            poster_index: BTreeMap::new(),
            hauler_index: BTreeMap::new(),
            tip_ledger: BTreeMap::new(),
            balances: BalanceSheet::new(),
            escrow_total: Amount::ZERO,
            events: Vec::new(),
        })
    }

    // ─── Job lifecycle ───────────────────────────────────────────────

    /// Create a job, escrowing `amount` attached by the caller.
    ///
    /// The fee is fixed at creation from the fee percent then in force;
    /// later fee changes affect only future jobs.
    pub fn create_job(
        &mut self,
        caller: AccountId,
        location: ContentRef,
        is_rush: bool,
        amount: Amount,
    ) -> Result<JobId, MarketError> {
        if amount.is_zero() {
            return Err(MarketError::invalid_input("job amount must be positive"));
        }
        let split = amount.fee_split(self.fee_percent)?;
        let escrow_total = self.escrow_total.checked_add(amount)?;

        let id = JobId(self.next_job_id);
        self.next_job_id += 1;
        self.jobs.insert(
            id,
            Job {
                id,
                poster: caller,
                hauler: None,
                status: JobStatus::Created,
                payment: split.payment,
                fee: split.fee,
                tip: Amount::ZERO,
                is_rush,
                location,
                created_at: Timestamp::now(),
                accepted_at: None,
                completed_at: None,
            },
        );
        self.poster_index.entry(caller).or_default().push(id);
        self.escrow_total = escrow_total;
        self.record(LedgerEventKind::JobCreated {
            job: id,
            poster: caller,
            payment: split.payment,
            fee: split.fee,
        });
        Ok(id)
    }

    /// Accept a job. The poster cannot accept its own job.
    pub fn accept_job(&mut self, caller: AccountId, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        if caller == job.poster {
            return Err(MarketError::unauthorized(
                "poster cannot accept its own job",
            ));
        }
        require_status(job, &[JobStatus::Created], "accept")?;

        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.hauler = Some(caller);
        job.status = JobStatus::Accepted;
        job.accepted_at = Some(Timestamp::now());
        self.hauler_index.entry(caller).or_default().push(id);
        self.record(LedgerEventKind::JobAccepted {
            job: id,
            hauler: caller,
        });
        Ok(())
    }

    /// Report transit start. Informational for payment purposes, but part
    /// of the authoritative status.
    pub fn start_transit(&mut self, caller: AccountId, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        require_assigned_hauler(job, caller)?;
        require_status(job, &[JobStatus::Accepted], "start transit")?;

        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.status = JobStatus::InTransit;
        self.record(LedgerEventKind::JobStatusChanged {
            job: id,
            from: JobStatus::Accepted,
            to: JobStatus::InTransit,
        });
        Ok(())
    }

    /// Complete a job: releases `payment + tip` to the hauler and `fee` to
    /// the fee collector in one atomic step.
    ///
    /// Allowed from `InTransit` or directly from `Accepted` — transit
    /// reporting is not a payment gate.
    pub fn complete_job(&mut self, caller: AccountId, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        require_assigned_hauler(job, caller)?;
        require_status(job, &[JobStatus::Accepted, JobStatus::InTransit], "complete")?;
        self.settle_to_hauler(id)
    }

    /// Add a tip. Anyone may tip any non-terminal job; funds are escrowed
    /// with the job and released with the payout (or refunded to the
    /// contributor on cancellation).
    pub fn add_tip(
        &mut self,
        caller: AccountId,
        id: JobId,
        amount: Amount,
    ) -> Result<(), MarketError> {
        if amount.is_zero() {
            return Err(MarketError::invalid_input("tip amount must be positive"));
        }
        let job = get_job(&self.jobs, id)?;
        if !job.status.accepts_tips() {
            return Err(MarketError::invalid_state(format!(
                "cannot tip a job in status {}",
                job.status
            )));
        }
        let new_tip = job.tip.checked_add(amount)?;
        let escrow_total = self.escrow_total.checked_add(amount)?;

        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.tip = new_tip;
        self.escrow_total = escrow_total;
        self.tip_ledger.entry(id).or_default().push(TipContribution {
            from: caller,
            amount,
        });
        self.record(LedgerEventKind::TipAdded {
            job: id,
            from: caller,
            amount,
        });
        Ok(())
    }

    /// Cancel a job before acceptance, refunding the full escrowed amount
    /// to the poster and any tips to their contributors.
    pub fn cancel_job(&mut self, caller: AccountId, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        if caller != job.poster {
            return Err(MarketError::unauthorized("only the poster may cancel"));
        }
        require_status(job, &[JobStatus::Created], "cancel")?;
        self.settle_to_poster(id)
    }

    /// Raise a dispute. Either party may dispute an accepted or in-transit
    /// job; resolution is owner-only.
    pub fn dispute_job(&mut self, caller: AccountId, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        let is_party = caller == job.poster || job.hauler == Some(caller);
        if !is_party {
            return Err(MarketError::unauthorized(
                "only the poster or the assigned hauler may dispute",
            ));
        }
        require_status(
            job,
            &[JobStatus::Accepted, JobStatus::InTransit],
            "dispute",
        )?;

        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.status = JobStatus::Disputed;
        self.record(LedgerEventKind::DisputeRaised { job: id, by: caller });
        Ok(())
    }

    /// Resolve a dispute. Favoring the hauler pays out exactly as a normal
    /// completion; favoring the poster refunds exactly as a cancellation.
    pub fn resolve_dispute(
        &mut self,
        caller: AccountId,
        id: JobId,
        favor_poster: bool,
    ) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the owner may resolve disputes",
            ));
        }
        let job = get_job(&self.jobs, id)?;
        require_status(job, &[JobStatus::Disputed], "resolve")?;

        if favor_poster {
            self.settle_to_poster(id)?;
        } else {
            self.settle_to_hauler(id)?;
        }
        self.record(LedgerEventKind::DisputeResolved {
            job: id,
            favor_poster,
        });
        Ok(())
    }

    // ─── Configuration (owner-only) ──────────────────────────────────

    /// Update the platform fee percent for future jobs.
    pub fn update_platform_fee(&mut self, caller: AccountId, pct: u8) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized("only the owner may set the fee"));
        }
        require_fee_percent(pct)?;
        self.fee_percent = pct;
        Ok(())
    }

    /// Update the fee collector for future payouts.
    pub fn update_fee_collector(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the owner may set the fee collector",
            ));
        }
        self.fee_collector = account;
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// Jobs created by a poster, in insertion order.
    pub fn poster_jobs(&self, poster: &AccountId) -> &[JobId] {
        self.poster_index.get(poster).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Jobs accepted by a hauler, in insertion order.
    pub fn hauler_jobs(&self, hauler: &AccountId) -> &[JobId] {
        self.hauler_index.get(hauler).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Full job details.
    pub fn job(&self, id: JobId) -> Result<&Job, MarketError> {
        get_job(&self.jobs, id)
    }

    /// Funds released to an account so far.
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.balance_of(account)
    }

    /// Funds currently held in escrow across all jobs.
    pub fn escrow_total(&self) -> Amount {
        self.escrow_total
    }

    /// The platform fee percent currently in force.
    pub fn fee_percent(&self) -> u8 {
        self.fee_percent
    }

    /// The current fee collector.
    pub fn fee_collector(&self) -> AccountId {
        self.fee_collector
    }

    /// The engine owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// The append-only event log.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // ─── Settlement internals ────────────────────────────────────────

    /// Pay out a job to its hauler: `payment + tip` to the hauler, `fee` to
    /// the fee collector, status Completed. All-or-nothing.
    fn settle_to_hauler(&mut self, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        let hauler = job.hauler.ok_or_else(|| {
            MarketError::invalid_state("cannot pay out a job with no assigned hauler")
        })?;
        let (payment, fee, tip) = (job.payment, job.fee, job.tip);
        let hauler_total = payment.checked_add(tip)?;
        let released = hauler_total.checked_add(fee)?;
        let escrow_total = self.escrow_total.checked_sub(released)?;

        self.balances
            .credit_all(&[(hauler, hauler_total), (self.fee_collector, fee)])?;
        self.escrow_total = escrow_total;
        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.status = JobStatus::Completed;
        job.completed_at = Some(Timestamp::now());
        self.record(LedgerEventKind::JobCompleted {
            job: id,
            payment,
            fee,
            tip,
        });
        Ok(())
    }

    /// Refund a job to its poster: `payment + fee` to the poster, each tip
    /// to its contributor, status Cancelled. All-or-nothing.
    fn settle_to_poster(&mut self, id: JobId) -> Result<(), MarketError> {
        let job = get_job(&self.jobs, id)?;
        let poster = job.poster;
        let refund = job.escrowed();
        let tip = job.tip;
        let released = refund.checked_add(tip)?;
        let escrow_total = self.escrow_total.checked_sub(released)?;

        let mut credits = vec![(poster, refund)];
        if let Some(contributions) = self.tip_ledger.get(&id) {
            for c in contributions {
                credits.push((c.from, c.amount));
            }
        }
        self.balances.credit_all(&credits)?;
        self.escrow_total = escrow_total;
        let job = self.jobs.get_mut(&id).ok_or_else(|| missing(id))?;
        job.status = JobStatus::Cancelled;
        self.record(LedgerEventKind::JobCancelled { job: id, refund });
        Ok(())
    }

    /// Append to the event log.
    fn record(&mut self, kind: LedgerEventKind) {
        self.events.push(LedgerEvent::now(kind));
    }
}

impl JobDirectory for EscrowEngine {
    fn job_assignment(&self, job: JobId) -> Option<JobAssignment> {
        self.jobs.get(&job).map(|j| JobAssignment {
            poster: j.poster,
            hauler: j.hauler,
            active: !j.status.is_terminal(),
        })
    }
}

// ─── Shared handle ───────────────────────────────────────────────────

/// Single-threaded shared handle to an [`EscrowEngine`].
///
/// The delivery tracker holds one as its read-only [`JobDirectory`] while
/// the embedding layer keeps mutating the same engine through another
/// clone of the handle. Borrows follow `RefCell` rules: callers must not
/// invoke a tracker operation while holding a mutable borrow.
#[derive(Debug, Clone)]
pub struct SharedLedger(Rc<RefCell<EscrowEngine>>);

impl SharedLedger {
    /// Wrap an engine in a shared handle.
    pub fn new(engine: EscrowEngine) -> Self {
        Self(Rc::new(RefCell::new(engine)))
    }

    /// Immutable access to the engine.
    pub fn borrow(&self) -> Ref<'_, EscrowEngine> {
        self.0.borrow()
    }

    /// Mutable access to the engine.
    pub fn borrow_mut(&self) -> RefMut<'_, EscrowEngine> {
        self.0.borrow_mut()
    }
}

impl JobDirectory for SharedLedger {
    fn job_assignment(&self, job: JobId) -> Option<JobAssignment> {
        self.0.borrow().job_assignment(job)
    }
}

// ─── Check helpers ───────────────────────────────────────────────────

fn get_job(jobs: &BTreeMap<JobId, Job>, id: JobId) -> Result<&Job, MarketError> {
    jobs.get(&id).ok_or_else(|| missing(id))
}

fn missing(id: JobId) -> MarketError {
    MarketError::not_found(id.to_string())
}

fn require_assigned_hauler(job: &Job, caller: AccountId) -> Result<(), MarketError> {
    if job.hauler != Some(caller) {
        return Err(MarketError::unauthorized(
            "caller is not the assigned hauler",
        ));
    }
    Ok(())
}

fn require_status(job: &Job, allowed: &[JobStatus], action: &str) -> Result<(), MarketError> {
    if !allowed.contains(&job.status) {
        return Err(MarketError::invalid_state(format!(
            "cannot {action} a job in status {}",
            job.status
        )));
    }
    Ok(())
}

fn require_fee_percent(pct: u8) -> Result<(), MarketError> {
    if pct > MAX_FEE_PERCENT {
        return Err(MarketError::invalid_input(format!(
            "platform fee must be <= {MAX_FEE_PERCENT}%, got {pct}"
        )));
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> ContentRef {
        ContentRef::new("sha256:pickup-and-dropoff").unwrap()
    }

    struct Fixture {
        engine: EscrowEngine,
        owner: AccountId,
        collector: AccountId,
        poster: AccountId,
        hauler: AccountId,
    }

    fn fixture() -> Fixture {
        let owner = AccountId::new();
        let collector = AccountId::new();
        Fixture {
            engine: EscrowEngine::new(owner, collector, 5).unwrap(),
            owner,
            collector,
            poster: AccountId::new(),
            hauler: AccountId::new(),
        }
    }

    fn post_job(f: &mut Fixture, amount: u128) -> JobId {
        f.engine
            .create_job(f.poster, location(), false, Amount::new(amount))
            .unwrap()
    }

    fn accepted_job(f: &mut Fixture, amount: u128) -> JobId {
        let id = post_job(f, amount);
        f.engine.accept_job(f.hauler, id).unwrap();
        id
    }

    // ── Creation ─────────────────────────────────────────────────────

    #[test]
    fn test_create_job_splits_fee() {
        let mut f = fixture();
        let id = post_job(&mut f, 100_000_000_000_000_000);
        let job = f.engine.job(id).unwrap();
        assert_eq!(job.payment, Amount::new(95_000_000_000_000_000));
        assert_eq!(job.fee, Amount::new(5_000_000_000_000_000));
        assert_eq!(job.escrowed(), Amount::new(100_000_000_000_000_000));
        assert_eq!(job.status, JobStatus::Created);
        assert!(job.hauler.is_none());
    }

    #[test]
    fn test_create_job_rejects_zero_amount() {
        let mut f = fixture();
        let result = f
            .engine
            .create_job(f.poster, location(), false, Amount::ZERO);
        assert!(matches!(result, Err(MarketError::InvalidInput { .. })));
    }

    #[test]
    fn test_job_ids_are_monotonic() {
        let mut f = fixture();
        let a = post_job(&mut f, 100);
        let b = post_job(&mut f, 100);
        assert_eq!(a, JobId(1));
        assert_eq!(b, JobId(2));
    }

    #[test]
    fn test_poster_index_insertion_order() {
        let mut f = fixture();
        let a = post_job(&mut f, 100);
        let b = post_job(&mut f, 200);
        assert_eq!(f.engine.poster_jobs(&f.poster), &[a, b]);
        assert!(f.engine.poster_jobs(&f.hauler).is_empty());
    }

    // ── Acceptance ───────────────────────────────────────────────────

    #[test]
    fn test_accept_sets_hauler_and_timestamp() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let job = f.engine.job(id).unwrap();
        assert_eq!(job.status, JobStatus::Accepted);
        assert_eq!(job.hauler, Some(f.hauler));
        assert!(job.accepted_at.is_some());
        assert_eq!(f.engine.hauler_jobs(&f.hauler), &[id]);
    }

    #[test]
    fn test_poster_cannot_accept_own_job() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        let result = f.engine.accept_job(f.poster, id);
        assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Created);
    }

    #[test]
    fn test_double_accept_fails_and_keeps_first_hauler() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let other = AccountId::new();
        let result = f.engine.accept_job(other, id);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
        assert_eq!(f.engine.job(id).unwrap().hauler, Some(f.hauler));
    }

    #[test]
    fn test_accept_unknown_job() {
        let mut f = fixture();
        let result = f.engine.accept_job(f.hauler, JobId(99));
        assert!(matches!(result, Err(MarketError::NotFound { .. })));
    }

    // ── Completion ───────────────────────────────────────────────────

    #[test]
    fn test_complete_pays_hauler_and_collector_atomically() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 100_000_000_000_000_000);
        f.engine.start_transit(f.hauler, id).unwrap();
        f.engine.complete_job(f.hauler, id).unwrap();

        assert_eq!(
            f.engine.balance_of(&f.hauler),
            Amount::new(95_000_000_000_000_000)
        );
        assert_eq!(
            f.engine.balance_of(&f.collector),
            Amount::new(5_000_000_000_000_000)
        );
        assert_eq!(f.engine.escrow_total(), Amount::ZERO);
        let job = f.engine.job(id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_complete_directly_from_accepted() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.complete_job(f.hauler, id).unwrap();
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_complete_is_not_repeatable() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.complete_job(f.hauler, id).unwrap();
        let balance = f.engine.balance_of(&f.hauler);
        let result = f.engine.complete_job(f.hauler, id);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
        assert_eq!(f.engine.balance_of(&f.hauler), balance);
    }

    #[test]
    fn test_only_assigned_hauler_completes() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let result = f.engine.complete_job(f.poster, id);
        assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
    }

    #[test]
    fn test_start_transit_requires_accepted() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        // Not yet accepted, so the caller cannot be the assigned hauler.
        assert!(f.engine.start_transit(f.hauler, id).is_err());
    }

    // ── Tips ─────────────────────────────────────────────────────────

    #[test]
    fn test_tip_released_with_payout() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let tipper = AccountId::new();
        f.engine.add_tip(tipper, id, Amount::new(250)).unwrap();
        f.engine.complete_job(f.hauler, id).unwrap();
        // 950 payment + 250 tip.
        assert_eq!(f.engine.balance_of(&f.hauler), Amount::new(1_200));
        assert_eq!(f.engine.balance_of(&f.collector), Amount::new(50));
    }

    #[test]
    fn test_tip_accumulates() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        f.engine.add_tip(f.poster, id, Amount::new(10)).unwrap();
        f.engine.add_tip(f.poster, id, Amount::new(15)).unwrap();
        assert_eq!(f.engine.job(id).unwrap().tip, Amount::new(25));
    }

    #[test]
    fn test_tip_rejected_after_completion() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.complete_job(f.hauler, id).unwrap();
        let result = f.engine.add_tip(f.poster, id, Amount::new(10));
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    }

    #[test]
    fn test_zero_tip_rejected() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        assert!(f.engine.add_tip(f.poster, id, Amount::ZERO).is_err());
    }

    // ── Cancellation ─────────────────────────────────────────────────

    #[test]
    fn test_cancel_refunds_full_escrow() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        f.engine.cancel_job(f.poster, id).unwrap();
        assert_eq!(f.engine.balance_of(&f.poster), Amount::new(1_000));
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Cancelled);
        assert_eq!(f.engine.escrow_total(), Amount::ZERO);
    }

    #[test]
    fn test_cancel_refunds_tips_to_contributors() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        let tipper = AccountId::new();
        f.engine.add_tip(tipper, id, Amount::new(77)).unwrap();
        f.engine.cancel_job(f.poster, id).unwrap();
        assert_eq!(f.engine.balance_of(&f.poster), Amount::new(1_000));
        assert_eq!(f.engine.balance_of(&tipper), Amount::new(77));
    }

    #[test]
    fn test_cancel_after_acceptance_disallowed() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let result = f.engine.cancel_job(f.poster, id);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Accepted);
    }

    #[test]
    fn test_only_poster_cancels() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        let result = f.engine.cancel_job(f.hauler, id);
        assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
    }

    // ── Disputes ─────────────────────────────────────────────────────

    #[test]
    fn test_either_party_may_dispute() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.dispute_job(f.poster, id).unwrap();
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Disputed);

        let id2 = accepted_job(&mut f, 1_000);
        f.engine.dispute_job(f.hauler, id2).unwrap();
        assert_eq!(f.engine.job(id2).unwrap().status, JobStatus::Disputed);
    }

    #[test]
    fn test_third_party_cannot_dispute() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let result = f.engine.dispute_job(AccountId::new(), id);
        assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
    }

    #[test]
    fn test_cannot_dispute_created_job() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        let result = f.engine.dispute_job(f.poster, id);
        assert!(matches!(result, Err(MarketError::InvalidState { .. })));
    }

    #[test]
    fn test_resolution_favoring_hauler_matches_completion() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.dispute_job(f.poster, id).unwrap();
        f.engine.resolve_dispute(f.owner, id, false).unwrap();
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Completed);
        assert_eq!(f.engine.balance_of(&f.hauler), Amount::new(950));
        assert_eq!(f.engine.balance_of(&f.collector), Amount::new(50));
    }

    #[test]
    fn test_resolution_favoring_poster_matches_cancellation() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.dispute_job(f.hauler, id).unwrap();
        f.engine.resolve_dispute(f.owner, id, true).unwrap();
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Cancelled);
        assert_eq!(f.engine.balance_of(&f.poster), Amount::new(1_000));
        assert_eq!(f.engine.balance_of(&f.hauler), Amount::ZERO);
    }

    #[test]
    fn test_only_owner_resolves() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.dispute_job(f.poster, id).unwrap();
        let result = f.engine.resolve_dispute(f.poster, id, true);
        assert!(matches!(result, Err(MarketError::Unauthorized { .. })));
        assert_eq!(f.engine.job(id).unwrap().status, JobStatus::Disputed);
    }

    // ── Configuration ────────────────────────────────────────────────

    #[test]
    fn test_fee_update_caps_at_twenty() {
        let mut f = fixture();
        assert!(f.engine.update_platform_fee(f.owner, 21).is_err());
        f.engine.update_platform_fee(f.owner, 20).unwrap();
        assert_eq!(f.engine.fee_percent(), 20);
    }

    #[test]
    fn test_fee_update_is_owner_only() {
        let mut f = fixture();
        assert!(f.engine.update_platform_fee(f.poster, 10).is_err());
    }

    #[test]
    fn test_fee_change_affects_future_jobs_only() {
        let mut f = fixture();
        let before = post_job(&mut f, 1_000);
        f.engine.update_platform_fee(f.owner, 10).unwrap();
        let after = post_job(&mut f, 1_000);
        assert_eq!(f.engine.job(before).unwrap().fee, Amount::new(50));
        assert_eq!(f.engine.job(after).unwrap().fee, Amount::new(100));
    }

    #[test]
    fn test_collector_update_applies_to_later_payouts() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let new_collector = AccountId::new();
        f.engine.update_fee_collector(f.owner, new_collector).unwrap();
        f.engine.complete_job(f.hauler, id).unwrap();
        assert_eq!(f.engine.balance_of(&new_collector), Amount::new(50));
        assert_eq!(f.engine.balance_of(&f.collector), Amount::ZERO);
    }

    #[test]
    fn test_engine_rejects_construction_with_excess_fee() {
        assert!(EscrowEngine::new(AccountId::new(), AccountId::new(), 21).is_err());
    }

    // ── Event log ────────────────────────────────────────────────────

    #[test]
    fn test_event_per_successful_operation() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        f.engine.start_transit(f.hauler, id).unwrap();
        f.engine.complete_job(f.hauler, id).unwrap();
        let kinds: Vec<_> = f.engine.events().iter().map(|e| &e.kind).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(kinds[0], LedgerEventKind::JobCreated { .. }));
        assert!(matches!(kinds[1], LedgerEventKind::JobAccepted { .. }));
        assert!(matches!(kinds[2], LedgerEventKind::JobStatusChanged { .. }));
        assert!(matches!(kinds[3], LedgerEventKind::JobCompleted { .. }));
    }

    #[test]
    fn test_failed_operation_emits_no_event() {
        let mut f = fixture();
        let id = post_job(&mut f, 1_000);
        let before = f.engine.events().len();
        let _ = f.engine.accept_job(f.poster, id);
        assert_eq!(f.engine.events().len(), before);
    }

    // ── Directory view ───────────────────────────────────────────────

    #[test]
    fn test_job_assignment_view() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let assignment = f.engine.job_assignment(id).unwrap();
        assert_eq!(assignment.poster, f.poster);
        assert_eq!(assignment.hauler, Some(f.hauler));
        assert!(assignment.active);
        assert!(f.engine.job_assignment(JobId(99)).is_none());
    }

    #[test]
    fn test_shared_ledger_reads_through() {
        let mut f = fixture();
        let id = accepted_job(&mut f, 1_000);
        let hauler = f.hauler;
        let shared = SharedLedger::new(f.engine);
        let assignment = shared.job_assignment(id).unwrap();
        assert_eq!(assignment.hauler, Some(hauler));
        shared.borrow_mut().complete_job(hauler, id).unwrap();
        assert!(!shared.job_assignment(id).unwrap().active);
    }
}
