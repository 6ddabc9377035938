//! # Job Directory — Read-Only Cross-Component Query
//!
//! The delivery tracker must verify that a caller is the hauler assigned to
//! a job before accepting proof-of-delivery data. That fact is owned by the
//! escrow ledger. To keep ownership acyclic, the tracker consumes the ledger
//! through this trait: one query method, no mutation path.
//!
//! The ledger crate implements `JobDirectory`; the tracker is generic over
//! it and receives an implementation at construction.

use serde::{Deserialize, Serialize};

use crate::identity::{AccountId, JobId};

/// The assignment facts the tracker is allowed to read about a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignment {
    /// The identity that created and funded the job.
    pub poster: AccountId,
    /// The assigned hauler, if the job has been accepted.
    pub hauler: Option<AccountId>,
    /// Whether the job is still active (not completed or cancelled).
    pub active: bool,
}

/// Read-only view of the ledger's job assignments.
pub trait JobDirectory {
    /// Look up the assignment facts for a job. `None` if the job does not
    /// exist.
    fn job_assignment(&self, job: JobId) -> Option<JobAssignment>;
}
