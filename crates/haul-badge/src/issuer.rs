//! # Badge Issuer
//!
//! Idempotent, monotonic badge issuance. Only addresses on the issuer
//! allow-list (typically the escrow ledger's settlement hook, managed by
//! the owner) may mint or upgrade; nobody, owner included, may transfer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use haul_core::{AccountId, MarketError, Timestamp, TokenId};

use crate::badge::{Badge, BadgeType};

/// A single entry in the issuer's event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeEvent {
    /// When the event was recorded (UTC).
    pub at: Timestamp,
    /// What happened.
    pub kind: BadgeEventKind,
}

/// The issuance state changes the issuer announces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeEventKind {
    /// An account was added to the issuer allow-list.
    IssuerAdded { account: AccountId },
    /// An account was removed from the issuer allow-list.
    IssuerRemoved { account: AccountId },
    /// A new badge was minted.
    BadgeMinted {
        token: TokenId,
        owner: AccountId,
        badge_type: BadgeType,
        level: u32,
    },
    /// An existing badge was upgraded in place.
    BadgeUpgraded { token: TokenId, level: u32 },
}

/// The badge issuer engine.
#[derive(Debug)]
pub struct BadgeIssuer {
    owner: AccountId,
    approved: BTreeSet<AccountId>,
    next_token_id: u64,
    tokens: BTreeMap<TokenId, Badge>,
    owner_index: BTreeMap<AccountId, Vec<TokenId>>,
    type_index: BTreeMap<(AccountId, BadgeType), TokenId>,
    events: Vec<BadgeEvent>,
}

impl BadgeIssuer {
    /// Create an issuer with an empty allow-list, controlled by `owner`.
    ///
    /// The owner manages the list but is not implicitly on it.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            approved: BTreeSet::new(),
            next_token_id: 1,
            tokens: BTreeMap::new(),
            owner_index: BTreeMap::new(),
            type_index: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    // ─── Allow-list management (owner-only) ──────────────────────────

    /// Add an account to the issuer allow-list.
    pub fn add_issuer(&mut self, caller: AccountId, account: AccountId) -> Result<(), MarketError> {
        self.require_owner(caller)?;
        if self.approved.insert(account) {
            self.record(BadgeEventKind::IssuerAdded { account });
        }
        Ok(())
    }

    /// Remove an account from the issuer allow-list.
    pub fn remove_issuer(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> Result<(), MarketError> {
        self.require_owner(caller)?;
        if self.approved.remove(&account) {
            self.record(BadgeEventKind::IssuerRemoved { account });
        }
        Ok(())
    }

    /// Whether an account is on the allow-list.
    pub fn is_approved_issuer(&self, account: &AccountId) -> bool {
        self.approved.contains(account)
    }

    // ─── Issuance ────────────────────────────────────────────────────

    /// Mint a badge, or upgrade the existing one for this (owner, type).
    ///
    /// A fresh (owner, type) pair mints a new sequential token at the given
    /// level. An existing pair requires `level > existing.level` and
    /// updates level and metadata in place — the token id is stable.
    pub fn issue_badge(
        &mut self,
        caller: AccountId,
        owner: AccountId,
        badge_type: BadgeType,
        level: u32,
        metadata_uri: impl Into<String>,
    ) -> Result<TokenId, MarketError> {
        if !self.approved.contains(&caller) {
            return Err(MarketError::unauthorized(
                "caller is not an approved issuer",
            ));
        }
        if level == 0 {
            return Err(MarketError::invalid_input("badge level must be at least 1"));
        }

        if let Some(&token) = self.type_index.get(&(owner, badge_type)) {
            let badge = self
                .tokens
                .get_mut(&token)
                .ok_or_else(|| MarketError::not_found(token.to_string()))?;
            if level <= badge.level {
                return Err(MarketError::invalid_state("New level must be higher"));
            }
            badge.level = level;
            badge.metadata_uri = metadata_uri.into();
            badge.upgraded_at = Some(Timestamp::now());
            self.record(BadgeEventKind::BadgeUpgraded { token, level });
            return Ok(token);
        }

        let token = TokenId(self.next_token_id);
        self.next_token_id += 1;
        self.tokens.insert(
            token,
            Badge {
                id: token,
                owner,
                badge_type,
                level,
                metadata_uri: metadata_uri.into(),
                issued_at: Timestamp::now(),
                upgraded_at: None,
            },
        );
        self.owner_index.entry(owner).or_default().push(token);
        self.type_index.insert((owner, badge_type), token);
        self.record(BadgeEventKind::BadgeMinted {
            token,
            owner,
            badge_type,
            level,
        });
        Ok(token)
    }

    /// Transfers always fail: badges are soul-bound to the account they
    /// were minted for.
    pub fn transfer(
        &mut self,
        _caller: AccountId,
        token: TokenId,
        _to: AccountId,
    ) -> Result<(), MarketError> {
        if !self.tokens.contains_key(&token) {
            return Err(MarketError::not_found(token.to_string()));
        }
        Err(MarketError::invalid_state("Badges are not transferable"))
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// Whether the account holds a badge of this type, and at what level
    /// (0 when absent).
    pub fn has_badge(&self, owner: &AccountId, badge_type: BadgeType) -> (bool, u32) {
        match self.type_index.get(&(*owner, badge_type)) {
            Some(token) => {
                let level = self.tokens.get(token).map(|b| b.level).unwrap_or(0);
                (true, level)
            }
            None => (false, 0),
        }
    }

    /// Token ids held by an account, in issuance order — one per distinct
    /// badge type.
    pub fn user_badges(&self, owner: &AccountId) -> &[TokenId] {
        self.owner_index.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of badges held by an account.
    pub fn balance_of(&self, owner: &AccountId) -> usize {
        self.user_badges(owner).len()
    }

    /// Full badge details.
    pub fn badge(&self, token: TokenId) -> Result<&Badge, MarketError> {
        self.tokens
            .get(&token)
            .ok_or_else(|| MarketError::not_found(token.to_string()))
    }

    /// The issuer owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// The append-only event log.
    pub fn events(&self) -> &[BadgeEvent] {
        &self.events
    }

    // ─── Internals ───────────────────────────────────────────────────

    fn require_owner(&self, caller: AccountId) -> Result<(), MarketError> {
        if caller != self.owner {
            return Err(MarketError::unauthorized(
                "only the owner may manage the issuer allow-list",
            ));
        }
        Ok(())
    }

    fn record(&mut self, kind: BadgeEventKind) {
        self.events.push(BadgeEvent {
            at: Timestamp::now(),
            kind,
        });
    }
}
