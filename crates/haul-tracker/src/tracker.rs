//! # Delivery Tracker
//!
//! Chronological proof-of-delivery trail, gated by the escrow ledger's
//! hauler assignment. The tracker never writes to the ledger — it reads
//! assignments through the [`JobDirectory`] view injected at construction,
//! and the owner can swap that view (the deployment re-pointing the tracker
//! at a replacement ledger).
//!
//! ## Authorization
//!
//! Every trail-writing operation resolves the caller against the directory:
//! unknown job → `NotFound`; caller is not the assigned hauler →
//! `Unauthorized`; job closed on the ledger → `InvalidState` (the recorded
//! trail stays readable). The verifier's status override is the one
//! exception, and it is logged distinctly for audit.

use std::collections::BTreeMap;

use haul_core::{AccountId, ContentRef, JobDirectory, JobId, MarketError, Timestamp};

use crate::event::{TrackerEvent, TrackerEventKind};
use crate::record::{
    require_battery_level, DeliveryRecord, DeliveryStatus, LocationUpdate, Milestone,
    MilestoneKind,
};

/// A single entry in a batch location upload: reference, reading time
/// (Unix epoch seconds originally, parsed upstream), battery level.
pub type BatchEntry = (ContentRef, Timestamp, u8);

/// The delivery tracker engine.
#[derive(Debug)]
pub struct DeliveryTracker<D: JobDirectory> {
    owner: AccountId,
    verifier: AccountId,
    directory: D,
    records: BTreeMap<JobId, DeliveryRecord>,
    events: Vec<TrackerEvent>,
}

impl<D: JobDirectory> DeliveryTracker<D> {
    /// Create a tracker with the given owner, verifier, and ledger view.
    pub fn new(owner: AccountId, verifier: AccountId, directory: D) -> Self {
        Self {
            owner,
            verifier,
            directory,
            records: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    // ─── Trail writing (assigned hauler only) ────────────────────────

    /// Start the delivery: creates the record, moves NotStarted →
    /// InTransit, and appends the first location update.
    pub fn start_delivery(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
    ) -> Result<(), MarketError> {
        self.require_assigned_hauler(caller, job)?;
        if self.records.contains_key(&job) {
            return Err(MarketError::invalid_state("delivery already started"));
        }
        let now = Timestamp::now();
        self.records.insert(
            job,
            DeliveryRecord {
                job,
                hauler: caller,
                status: DeliveryStatus::InTransit,
                location_updates: vec![LocationUpdate {
                    location,
                    at: now,
                    battery_level: 100,
                    note: String::new(),
                }],
                milestones: Vec::new(),
                started_at: now,
            },
        );
        self.record_event(TrackerEventKind::DeliveryStarted { job, hauler: caller });
        self.record_event(TrackerEventKind::DeliveryStatusChanged {
            job,
            from: DeliveryStatus::NotStarted,
            to: DeliveryStatus::InTransit,
        });
        Ok(())
    }

    /// Append a location update while in transit. Does not change status.
    pub fn update_location(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
        battery_level: u8,
        note: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.require_assigned_hauler(caller, job)?;
        require_battery_level(battery_level)?;
        let record = self.record_in_status(job, DeliveryStatus::InTransit, "update location")?;
        record.location_updates.push(LocationUpdate {
            location,
            at: Timestamp::now(),
            battery_level,
            note: note.into(),
        });
        let count = record.location_updates.len();
        self.record_event(TrackerEventKind::LocationUpdated { job, count });
        Ok(())
    }

    /// Append several location updates in one call. All-or-nothing: every
    /// entry is validated before any is appended.
    pub fn batch_update_locations(
        &mut self,
        caller: AccountId,
        job: JobId,
        entries: &[BatchEntry],
    ) -> Result<(), MarketError> {
        self.require_assigned_hauler(caller, job)?;
        if entries.is_empty() {
            return Err(MarketError::invalid_input("batch must not be empty"));
        }
        for (_, _, battery_level) in entries {
            require_battery_level(*battery_level)?;
        }
        let record = self.record_in_status(job, DeliveryStatus::InTransit, "update location")?;
        for (location, at, battery_level) in entries {
            record.location_updates.push(LocationUpdate {
                location: location.clone(),
                at: *at,
                battery_level: *battery_level,
                note: String::new(),
            });
        }
        let count = record.location_updates.len();
        self.record_event(TrackerEventKind::LocationUpdated { job, count });
        Ok(())
    }

    /// Confirm pickup with proof: InTransit → PickupConfirmed.
    pub fn confirm_pickup(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
        proof: ContentRef,
        note: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.milestone_transition(
            caller,
            job,
            DeliveryStatus::InTransit,
            DeliveryStatus::PickupConfirmed,
            MilestoneKind::Pickup,
            location,
            proof,
            note.into(),
        )
    }

    /// Record arrival with proof: PickupConfirmed → AtDropoff.
    pub fn arrive_at_dropoff(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
        proof: ContentRef,
        note: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.milestone_transition(
            caller,
            job,
            DeliveryStatus::PickupConfirmed,
            DeliveryStatus::AtDropoff,
            MilestoneKind::Arrival,
            location,
            proof,
            note.into(),
        )
    }

    /// Record completion with proof: AtDropoff → Delivered (terminal).
    pub fn complete_delivery(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
        proof: ContentRef,
        note: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.milestone_transition(
            caller,
            job,
            DeliveryStatus::AtDropoff,
            DeliveryStatus::Delivered,
            MilestoneKind::Completion,
            location,
            proof,
            note.into(),
        )
    }

    /// Report a failed delivery: any non-terminal status → Failed
    /// (terminal). A job abandoned before any trail activity has no record
    /// yet; the failure report itself opens one.
    pub fn report_failed_delivery(
        &mut self,
        caller: AccountId,
        job: JobId,
        location: ContentRef,
        proof: ContentRef,
        note: impl Into<String>,
    ) -> Result<(), MarketError> {
        self.require_assigned_hauler(caller, job)?;
        let now = Timestamp::now();
        let milestone = Milestone {
            kind: MilestoneKind::Failure,
            location,
            proof,
            note: note.into(),
            recorded_at: now,
        };
        let from = match self.records.get_mut(&job) {
            Some(record) => {
                if record.status.is_terminal() {
                    return Err(MarketError::invalid_state(format!(
                        "cannot fail a delivery in terminal status {}",
                        record.status
                    )));
                }
                let from = record.status;
                record.status = DeliveryStatus::Failed;
                record.milestones.push(milestone);
                from
            }
            None => {
                self.records.insert(
                    job,
                    DeliveryRecord {
                        job,
                        hauler: caller,
                        status: DeliveryStatus::Failed,
                        location_updates: Vec::new(),
                        milestones: vec![milestone],
                        started_at: now,
                    },
                );
                DeliveryStatus::NotStarted
            }
        };
        self.record_event(TrackerEventKind::MilestoneRecorded {
            job,
            kind: MilestoneKind::Failure,
        });
        self.record_event(TrackerEventKind::DeliveryStatusChanged {
            job,
            from,
            to: DeliveryStatus::Failed,
        });
        Ok(())
    }

    // ─── Admin operations ────────────────────────────────────────────

    /// Force a delivery status, bypassing the transition table.
    ///
    /// Verifier or owner only. This is an escape hatch, not a normal
    /// transition: it is logged as `AdminOverride`, never as
    /// `DeliveryStatusChanged`.
    pub fn override_delivery_status(
        &mut self,
        caller: AccountId,
        job: JobId,
        new_status: DeliveryStatus,
        reason: impl Into<String>,
    ) -> Result<(), MarketError> {
        if caller != self.verifier && caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the verifier or owner may override delivery status",
            ));
        }
        let record = self
            .records
            .get_mut(&job)
            .ok_or_else(|| MarketError::not_found(job.to_string()))?;
        let from = record.status;
        record.status = new_status;
        self.record_event(TrackerEventKind::AdminOverride {
            job,
            from,
            to: new_status,
            reason: reason.into(),
        });
        Ok(())
    }

    /// Swap the ledger view. Owner only.
    pub fn update_directory(&mut self, caller: AccountId, directory: D) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the owner may update the ledger view",
            ));
        }
        self.directory = directory;
        Ok(())
    }

    /// Change the verifier. Owner only.
    pub fn update_verifier(
        &mut self,
        caller: AccountId,
        verifier: AccountId,
    ) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the owner may update the verifier",
            ));
        }
        self.verifier = verifier;
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// Number of location updates recorded for a job.
    pub fn location_update_count(&self, job: JobId) -> Result<usize, MarketError> {
        self.require_known_job(job)?;
        Ok(self
            .records
            .get(&job)
            .map(|r| r.location_updates.len())
            .unwrap_or(0))
    }

    /// Number of milestones recorded for a job.
    pub fn milestone_count(&self, job: JobId) -> Result<usize, MarketError> {
        self.require_known_job(job)?;
        Ok(self.records.get(&job).map(|r| r.milestones.len()).unwrap_or(0))
    }

    /// Current delivery status. `NotStarted` for a known job with no
    /// delivery activity yet.
    pub fn current_status(&self, job: JobId) -> Result<DeliveryStatus, MarketError> {
        self.require_known_job(job)?;
        Ok(self
            .records
            .get(&job)
            .map(|r| r.status)
            .unwrap_or(DeliveryStatus::NotStarted))
    }

    /// The full delivery record, if the delivery has started.
    pub fn record(&self, job: JobId) -> Result<&DeliveryRecord, MarketError> {
        self.records
            .get(&job)
            .ok_or_else(|| MarketError::not_found(job.to_string()))
    }

    /// The current verifier.
    pub fn verifier(&self) -> AccountId {
        self.verifier
    }

    /// The append-only event log.
    pub fn events(&self) -> &[TrackerEvent] {
        &self.events
    }

    // ─── Internals ───────────────────────────────────────────────────

    /// Shared shape of the three forward milestone transitions.
    #[allow(clippy::too_many_arguments)]
    fn milestone_transition(
        &mut self,
        caller: AccountId,
        job: JobId,
        from: DeliveryStatus,
        to: DeliveryStatus,
        kind: MilestoneKind,
        location: ContentRef,
        proof: ContentRef,
        note: String,
    ) -> Result<(), MarketError> {
        self.require_assigned_hauler(caller, job)?;
        let record = self.record_in_status(job, from, "record milestone")?;
        record.status = to;
        record.milestones.push(Milestone {
            kind,
            location,
            proof,
            note,
            recorded_at: Timestamp::now(),
        });
        self.record_event(TrackerEventKind::MilestoneRecorded { job, kind });
        self.record_event(TrackerEventKind::DeliveryStatusChanged { job, from, to });
        Ok(())
    }

    /// Resolve the caller against the ledger's assignment for the job.
    ///
    /// Trail writes close with the job: once the ledger marks it completed
    /// or cancelled, no further trail activity is accepted. The recorded
    /// trail stays readable.
    fn require_assigned_hauler(&self, caller: AccountId, job: JobId) -> Result<(), MarketError> {
        let assignment = self
            .directory
            .job_assignment(job)
            .ok_or_else(|| MarketError::not_found(job.to_string()))?;
        if assignment.hauler != Some(caller) {
            return Err(MarketError::unauthorized(
                "caller is not the assigned hauler",
            ));
        }
        if !assignment.active {
            return Err(MarketError::invalid_state(
                "job is closed on the ledger",
            ));
        }
        Ok(())
    }

    /// The record for a job, required to be in the given status.
    fn record_in_status(
        &mut self,
        job: JobId,
        expected: DeliveryStatus,
        action: &str,
    ) -> Result<&mut DeliveryRecord, MarketError> {
        let record = self
            .records
            .get_mut(&job)
            .ok_or_else(|| MarketError::invalid_state("delivery has not started"))?;
        if record.status != expected {
            return Err(MarketError::invalid_state(format!(
                "cannot {action} in status {}, expected {expected}",
                record.status
            )));
        }
        Ok(record)
    }

    /// NotFound unless the ledger knows the job.
    fn require_known_job(&self, job: JobId) -> Result<(), MarketError> {
        if self.directory.job_assignment(job).is_none() {
            return Err(MarketError::not_found(job.to_string()));
        }
        Ok(())
    }

    /// Append to the event log.
    fn record_event(&mut self, kind: TrackerEventKind) {
        self.events.push(TrackerEvent::now(kind));
    }
}
