//! # Badge Metadata URIs
//!
//! A badge's metadata URI comes in two forms: a remote HTTP(S) URL, or the
//! metadata JSON embedded directly in the URI as base64. Consumers treat
//! both identically once decoded — this module is the single decode path.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use haul_core::MarketError;

/// Prefix of an embedded base64-JSON metadata payload.
const DATA_JSON_PREFIX: &str = "data:application/json;base64,";

/// Decoded badge metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum BadgeMetadata {
    /// Metadata hosted remotely; the consumer fetches it.
    Remote(String),
    /// Metadata embedded in the URI itself.
    Embedded(serde_json::Value),
}

/// Decode a metadata URI into its remote or embedded form.
///
/// # Errors
///
/// Returns `InvalidInput` for an unrecognized scheme, malformed base64, or
/// an embedded payload that is not valid JSON.
pub fn decode_metadata(uri: &str) -> Result<BadgeMetadata, MarketError> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(BadgeMetadata::Remote(uri.to_string()));
    }
    if let Some(payload) = uri.strip_prefix(DATA_JSON_PREFIX) {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| MarketError::invalid_input(format!("malformed base64 metadata: {e}")))?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| MarketError::invalid_input(format!("embedded metadata is not JSON: {e}")))?;
        return Ok(BadgeMetadata::Embedded(value));
    }
    Err(MarketError::invalid_input(format!(
        "unrecognized metadata URI scheme: {uri:?}"
    )))
}
