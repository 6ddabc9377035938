//! # Error Taxonomy
//!
//! The single error type shared by every engine in the workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Four kinds, no more: wrong caller, wrong state, bad input, missing
//!   entity. Callers can match on the kind; humans read the reason.
//! - Every operation that returns a `MarketError` must do so **before**
//!   mutating anything — an error implies no observable state change.
//! - No automatic retry lives at this layer; retries belong to the caller.

use thiserror::Error;

/// Top-level error type for the HaulHub core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// The caller is not permitted to perform the requested action.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Why the caller was rejected.
        reason: String,
    },

    /// The operation is not legal from the entity's current status.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Why the operation was rejected.
        reason: String,
    },

    /// The request payload itself is malformed.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The referenced job, token, or record does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up and missed.
        what: String,
    },
}

impl MarketError {
    /// Construct an `Unauthorized` error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Construct an `InvalidState` error.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Construct an `InvalidInput` error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Construct a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
