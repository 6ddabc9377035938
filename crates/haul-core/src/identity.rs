//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the HaulHub core.
//! These prevent accidental identifier confusion — you cannot pass a
//! `JobId` where a `TokenId` is expected, or a badge token where an
//! account handle belongs.
//!
//! `AccountId` is the address-equivalent identity handle the embedding
//! layer hands to the core; the core never authenticates it, only compares
//! it. `JobId` and `TokenId` are monotonic, assigned by their owning
//! engine, and never reused.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity handle for a marketplace participant (poster, hauler, issuer,
/// fee collector, admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

/// Unique identifier for an escrowed delivery job.
///
/// Assigned monotonically by the escrow engine, starting at 1. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

/// Unique identifier for a badge token.
///
/// Assigned monotonically by the badge issuer, starting at 1. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl AccountId {
    /// Generate a new random account identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl JobId {
    /// Access the inner sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TokenId {
    /// Access the inner sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "account:{}", self.0)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job:{}", self.0)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "badge:{}", self.0)
    }
}
