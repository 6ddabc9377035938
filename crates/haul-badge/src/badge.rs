//! # Badge — Non-Transferable Reputation Token
//!
//! A badge records an achievement tier for one owner. Levels only go up:
//! re-issuing an existing (owner, type) pair upgrades the token in place,
//! it never mints a second one.

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, Timestamp, TokenId};

/// The achievement categories the marketplace recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BadgeType {
    /// Consistently fast deliveries.
    SpeedDemon,
    /// Low-emission transport choices.
    EcoWarrior,
    /// High-volume or heavy loads.
    LoadLord,
    /// Sustained delivery count.
    FrequentHauler,
    /// High completion rate.
    ReliableHauler,
    /// Fast job acceptance.
    QuickClaimer,
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SpeedDemon => "SPEED_DEMON",
            Self::EcoWarrior => "ECO_WARRIOR",
            Self::LoadLord => "LOAD_LORD",
            Self::FrequentHauler => "FREQUENT_HAULER",
            Self::ReliableHauler => "RELIABLE_HAULER",
            Self::QuickClaimer => "QUICK_CLAIMER",
        };
        f.write_str(s)
    }
}

/// A minted badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    /// Unique sequential token id.
    pub id: TokenId,
    /// The account the badge belongs to. Fixed at mint — badges never move.
    pub owner: AccountId,
    /// The achievement category.
    pub badge_type: BadgeType,
    /// Achievement tier, strictly increasing across re-issuances.
    pub level: u32,
    /// Metadata URI — an HTTP URL or an embedded base64-JSON payload.
    pub metadata_uri: String,
    /// When the badge was first minted.
    pub issued_at: Timestamp,
    /// When the badge was last upgraded, if ever.
    pub upgraded_at: Option<Timestamp>,
}
