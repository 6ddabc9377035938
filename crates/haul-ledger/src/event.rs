//! # Ledger Events
//!
//! Append-only observable log of escrow state changes. External collaborators
//! (API layer, indexers, UI) consume these; the engine's own invariants never
//! depend on them.

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, Amount, JobId, Timestamp};

use crate::job::JobStatus;

/// A single entry in the ledger's event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// When the event was recorded (UTC).
    pub at: Timestamp,
    /// What happened.
    pub kind: LedgerEventKind,
}

/// The escrow state changes the ledger announces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    /// A job was created and funded.
    JobCreated {
        job: JobId,
        poster: AccountId,
        payment: Amount,
        fee: Amount,
    },
    /// A hauler accepted a job.
    JobAccepted { job: JobId, hauler: AccountId },
    /// A non-payout status change (transit start).
    JobStatusChanged {
        job: JobId,
        from: JobStatus,
        to: JobStatus,
    },
    /// A job completed; payment, fee, and tip were released atomically.
    JobCompleted {
        job: JobId,
        payment: Amount,
        fee: Amount,
        tip: Amount,
    },
    /// A job was cancelled; the escrowed amount was refunded to the poster.
    JobCancelled { job: JobId, refund: Amount },
    /// A tip was added and escrowed.
    TipAdded {
        job: JobId,
        from: AccountId,
        amount: Amount,
    },
    /// A party raised a dispute.
    DisputeRaised { job: JobId, by: AccountId },
    /// The owner resolved a dispute.
    DisputeResolved { job: JobId, favor_poster: bool },
}

impl LedgerEvent {
    /// Record an event at the current time.
    pub fn now(kind: LedgerEventKind) -> Self {
        Self {
            at: Timestamp::now(),
            kind,
        }
    }
}
