//! # haul-tracker — Delivery Tracker
//!
//! Implements the proof-of-delivery trail for the HaulHub core:
//!
//! - **Record** (`record.rs`): the per-job delivery record — status
//!   machine, append-only location updates, proof-bearing milestones.
//!
//! - **Tracker** (`tracker.rs`): the engine. Trail writes are gated on the
//!   escrow ledger's hauler assignment, read through the `JobDirectory`
//!   view injected at construction. The verifier's status override is the
//!   only path around the transition table, and it is logged distinctly.
//!
//! - **Events** (`event.rs`): append-only observable log of delivery state
//!   changes.
//!
//! ## Crate Policy
//!
//! - Depends on `haul-core` internally, nothing else. The ledger crate is
//!   a dev-dependency only — production code sees it through the
//!   `JobDirectory` trait.
//! - The tracker never mutates the ledger.

pub mod event;
pub mod record;
pub mod tracker;

pub use event::{TrackerEvent, TrackerEventKind};
pub use record::{DeliveryRecord, DeliveryStatus, LocationUpdate, Milestone, MilestoneKind};
pub use tracker::{BatchEntry, DeliveryTracker};
