//! # haul-badge — Badge / Reputation Issuer
//!
//! Implements non-transferable reputation tokens for the HaulHub core:
//!
//! - **Badge** (`badge.rs`): the token and its six achievement categories.
//!
//! - **Issuer** (`issuer.rs`): allow-listed minting with monotonic
//!   per-(owner, type) levels — re-issuance upgrades in place, downgrades
//!   fail, transfers always fail.
//!
//! - **Metadata** (`metadata.rs`): the single decode path for metadata
//!   URIs, remote URL and embedded base64-JSON alike.
//!
//! ## Crate Policy
//!
//! - Depends on `haul-core` internally, nothing else.
//! - A badge's owner never changes after mint. There is no burn.

pub mod badge;
pub mod issuer;
pub mod metadata;

pub use badge::{Badge, BadgeType};
pub use issuer::{BadgeEvent, BadgeEventKind, BadgeIssuer};
pub use metadata::{decode_metadata, BadgeMetadata};
