//! # haul-ledger — Escrow Ledger Engine
//!
//! Implements the authoritative job lifecycle for the HaulHub core:
//!
//! - **Job** (`job.rs`): the escrowed delivery request and its status
//!   machine (Created → Accepted → InTransit → Completed, with Cancelled
//!   and Disputed branches).
//!
//! - **Engine** (`engine.rs`): payment custody, fee/tip accounting,
//!   dispute resolution, per-identity job indexes, and the
//!   `SharedLedger` handle the tracker consumes as a read-only
//!   `JobDirectory`.
//!
//! - **Balances** (`balances.rs`): credit-only settlement surface with
//!   atomic multi-account staging.
//!
//! - **Events** (`event.rs`): append-only observable log of escrow state
//!   changes.
//!
//! ## Crate Policy
//!
//! - Depends on `haul-core` internally, nothing else.
//! - Every money-moving operation is all-or-nothing: validation precedes
//!   the first write, and multi-account credits are staged atomically.

pub mod balances;
pub mod engine;
pub mod event;
pub mod job;

pub use balances::BalanceSheet;
pub use engine::{EscrowEngine, SharedLedger, TipContribution, MAX_FEE_PERCENT};
pub use event::{LedgerEvent, LedgerEventKind};
pub use job::{Job, JobStatus};
