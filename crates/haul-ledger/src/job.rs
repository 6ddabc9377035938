//! # Job — Escrowed Delivery Request
//!
//! The authoritative job record owned by the escrow engine.
//!
//! ## Status Machine
//!
//! ```text
//! Created ──accept──▶ Accepted ──start_transit──▶ InTransit ──complete──▶ Completed
//!    │                   │  │                        │
//!    │                   │  └────────complete────────┼──▶ Completed
//!    │                   │                           │
//! cancel              dispute                     dispute
//!    │                   │                           │
//!    ▼                   ▼                           ▼
//! Cancelled           Disputed ──resolve──▶ Completed | Cancelled
//! ```
//!
//! Completion directly from `Accepted` is deliberate: transit reporting is
//! informational, not a payment gate. `Completed` and `Cancelled` are
//! terminal.

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, Amount, ContentRef, JobId, Timestamp};

/// The lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Posted and funded, awaiting a hauler.
    Created,
    /// A hauler has accepted the job.
    Accepted,
    /// The hauler has reported transit start.
    InTransit,
    /// Delivered and paid out (terminal).
    Completed,
    /// Cancelled and refunded (terminal).
    Cancelled,
    /// Under dispute, awaiting owner resolution.
    Disputed,
}

impl JobStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether tips may still be added.
    pub fn accepts_tips(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::Accepted => "ACCEPTED",
            Self::InTransit => "IN_TRANSIT",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Disputed => "DISPUTED",
        };
        f.write_str(s)
    }
}

/// An escrowed delivery job.
///
/// `payment + fee` equals the amount escrowed at creation; `tip` accumulates
/// separately. Timestamps are set once and never reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique, monotonically assigned identifier.
    pub id: JobId,
    /// The identity that created and funded the job.
    pub poster: AccountId,
    /// The assigned hauler; unset until acceptance.
    pub hauler: Option<AccountId>,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Net amount owed to the hauler (escrow minus fee).
    pub payment: Amount,
    /// Platform cut, fixed at creation from the fee percent then in force.
    pub fee: Amount,
    /// Accumulated tips, addable by any party while the job is active.
    pub tip: Amount,
    /// Rush flag; carried through, affects no invariant here.
    pub is_rush: bool,
    /// Content-addressed reference to the pickup/dropoff payload.
    pub location: ContentRef,
    /// When the job was created.
    pub created_at: Timestamp,
    /// When the job was accepted, if it has been.
    pub accepted_at: Option<Timestamp>,
    /// When the job was completed, if it has been.
    pub completed_at: Option<Timestamp>,
}

impl Job {
    /// The amount escrowed at creation (`payment + fee`, tips excluded).
    /// Never overflows since both parts came from one fee split.
    pub fn escrowed(&self) -> Amount {
        Amount::new(self.payment.value() + self.fee.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Created.is_terminal());
        assert!(!JobStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_disputed_still_accepts_tips() {
        assert!(JobStatus::Disputed.accepts_tips());
        assert!(!JobStatus::Completed.accepts_tips());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Created.to_string(), "CREATED");
        assert_eq!(JobStatus::InTransit.to_string(), "IN_TRANSIT");
        assert_eq!(JobStatus::Disputed.to_string(), "DISPUTED");
    }
}
