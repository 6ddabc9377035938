//! # Content References
//!
//! `ContentRef` is the opaque content-addressed reference the core carries
//! for off-core payloads: pickup/dropoff coordinates, delivery photos,
//! signed proof documents. The core never dereferences one — it only stores
//! and compares them.
//!
//! [`ContentRef::for_bytes()`] is the canonical way the embedding layer
//! derives a reference from raw content: `sha256:<hex>`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::MarketError;

/// An opaque content-addressed reference string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef(String);

impl ContentRef {
    /// Wrap an existing reference string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the string is empty — an empty reference
    /// can never address content.
    pub fn new(value: impl Into<String>) -> Result<Self, MarketError> {
        let value = value.into();
        if value.is_empty() {
            return Err(MarketError::invalid_input("content reference must not be empty"));
        }
        Ok(Self(value))
    }

    /// Derive a reference from raw content bytes: `sha256:<hex>`.
    pub fn for_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("sha256:{hex}"))
    }

    /// Access the reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
