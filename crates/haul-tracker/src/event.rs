//! # Tracker Events
//!
//! Append-only observable log of delivery state changes. Admin overrides
//! are recorded as their own kind so auditors can separate them from
//! algorithmic transitions.

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, JobId, Timestamp};

use crate::record::{DeliveryStatus, MilestoneKind};

/// A single entry in the tracker's event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerEvent {
    /// When the event was recorded (UTC).
    pub at: Timestamp,
    /// What happened.
    pub kind: TrackerEventKind,
}

/// The delivery state changes the tracker announces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerEventKind {
    /// A hauler started a delivery.
    DeliveryStarted { job: JobId, hauler: AccountId },
    /// One or more location updates were appended; `count` is the new total.
    LocationUpdated { job: JobId, count: usize },
    /// A proof-bearing milestone was recorded.
    MilestoneRecorded { job: JobId, kind: MilestoneKind },
    /// A normal (table-driven) status transition.
    DeliveryStatusChanged {
        job: JobId,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },
    /// The verifier bypassed the transition table.
    AdminOverride {
        job: JobId,
        from: DeliveryStatus,
        to: DeliveryStatus,
        reason: String,
    },
}

impl TrackerEvent {
    /// Record an event at the current time.
    pub fn now(kind: TrackerEventKind) -> Self {
        Self {
            at: Timestamp::now(),
            kind,
        }
    }
}
