//! # Delivery Record
//!
//! The per-job proof-of-delivery trail: a status machine plus two
//! append-only sequences — chronological location updates and proof-bearing
//! milestones.
//!
//! ## Status Machine
//!
//! ```text
//! NotStarted ──start──▶ InTransit ──pickup──▶ PickupConfirmed ──arrive──▶ AtDropoff ──complete──▶ Delivered
//!                           │                      │                         │
//!                           └──────────────────────┴────────fail─────────────┴──▶ Failed
//! ```
//!
//! Transitions are strictly forward; `Delivered` and `Failed` are terminal.
//! `Failed` is reachable from any non-terminal state (including
//! `NotStarted`, for jobs the hauler abandons before moving). The only way
//! around the table is the verifier's explicit override, which is logged
//! distinctly.

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, ContentRef, JobId, MarketError, Timestamp};

/// The delivery status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// No delivery activity recorded yet.
    NotStarted,
    /// The hauler is en route to pickup.
    InTransit,
    /// Pickup confirmed with proof.
    PickupConfirmed,
    /// Arrived at the dropoff location.
    AtDropoff,
    /// Delivered with proof (terminal).
    Delivered,
    /// Delivery failed (terminal).
    Failed,
}

impl DeliveryStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InTransit => "IN_TRANSIT",
            Self::PickupConfirmed => "PICKUP_CONFIRMED",
            Self::AtDropoff => "AT_DROPOFF",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// The kind of proof-bearing milestone recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneKind {
    /// Package picked up.
    Pickup,
    /// Arrived at the dropoff.
    Arrival,
    /// Delivery completed.
    Completion,
    /// Delivery failed.
    Failure,
}

impl std::fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pickup => "PICKUP",
            Self::Arrival => "ARRIVAL",
            Self::Completion => "COMPLETION",
            Self::Failure => "FAILURE",
        };
        f.write_str(s)
    }
}

/// A single chronological location report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Content-addressed reference to the reported coordinates.
    pub location: ContentRef,
    /// When the reading was taken (UTC).
    pub at: Timestamp,
    /// Device battery level at report time, 0..=100.
    pub battery_level: u8,
    /// Free-text note from the hauler.
    pub note: String,
}

/// A proof-bearing delivery event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Which milestone this is.
    pub kind: MilestoneKind,
    /// Content-addressed reference to the coordinates at the event.
    pub location: ContentRef,
    /// Content-addressed reference to the proof payload (photo, signature).
    pub proof: ContentRef,
    /// Free-text note from the hauler.
    pub note: String,
    /// When the milestone was recorded (UTC).
    pub recorded_at: Timestamp,
}

/// The proof-of-delivery trail for one job.
///
/// Both sequences are append-only; nothing is ever edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// The job this record tracks.
    pub job: JobId,
    /// The hauler who started the delivery.
    pub hauler: AccountId,
    /// Current delivery status.
    pub status: DeliveryStatus,
    /// Chronological location reports.
    pub location_updates: Vec<LocationUpdate>,
    /// Proof-bearing milestones, in the order recorded.
    pub milestones: Vec<Milestone>,
    /// When the delivery was started.
    pub started_at: Timestamp,
}

/// Validate a battery level reading.
pub(crate) fn require_battery_level(level: u8) -> Result<(), MarketError> {
    if level > 100 {
        return Err(MarketError::invalid_input(format!(
            "battery level must be 0..=100, got {level}"
        )));
    }
    Ok(())
}
