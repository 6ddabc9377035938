//! # haul-core — Foundational Types for the HaulHub Core
//!
//! This crate is the bedrock of the HaulHub delivery marketplace core. It
//! defines the primitives shared by the escrow ledger, the delivery tracker,
//! and the badge issuer. Every other crate in the workspace depends on
//! `haul-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`, `JobId`,
//!    `TokenId`, `ContentRef`, `Amount` — all newtypes. No bare strings for
//!    identifiers, no bare integers for money.
//!
//! 2. **Integer money.** `Amount` is a `u128` in native minor units
//!    (wei-equivalent). Fee splits use floor division and always reassemble
//!    exactly: `payment + fee == amount`. No floats anywhere near a balance.
//!
//! 3. **One error taxonomy.** `MarketError` has exactly four kinds —
//!    `Unauthorized`, `InvalidState`, `InvalidInput`, `NotFound` — and every
//!    failing operation in the workspace returns one of them with a
//!    human-readable reason, leaving state untouched.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision.
//!
//! 5. **Read-only cross-component queries.** The tracker learns about job
//!    assignments exclusively through the `JobDirectory` trait — a single
//!    query method, never a mutation path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `haul-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod content;
pub mod directory;
pub mod error;
pub mod identity;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use content::ContentRef;
pub use directory::{JobAssignment, JobDirectory};
pub use error::MarketError;
pub use identity::{AccountId, JobId, TokenId};
pub use money::{Amount, FeeSplit};
pub use temporal::Timestamp;
