//! # Money — Escrow-Grade Integer Arithmetic
//!
//! Defines `Amount`, a fixed-point monetary quantity in native minor units
//! (wei-equivalent), and the fee split used at job creation.
//!
//! ## Security Invariant
//!
//! All balance arithmetic is checked integer arithmetic. Overflow is an
//! `InvalidInput` error, never a wrap or a panic. Fee splits use floor
//! division and reassemble exactly: for every amount and percent,
//! `payment + fee == amount`. There is no floating point in any path that
//! touches a balance.

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// A monetary amount in native minor units.
///
/// `u128` covers the full range of wei-denominated values. Construction is
/// free-form; arithmetic is checked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(pub u128);

/// The result of splitting an escrowed amount into hauler payment and
/// platform fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Net amount owed to the hauler on completion.
    pub payment: Amount,
    /// Platform cut, paid to the fee collector on completion.
    pub fee: Amount,
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw minor-unit value.
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// Access the raw minor-unit value.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on overflow.
    pub fn checked_add(self, other: Amount) -> Result<Amount, MarketError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| MarketError::invalid_input("amount overflow"))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on underflow.
    pub fn checked_sub(self, other: Amount) -> Result<Amount, MarketError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| MarketError::invalid_input("amount underflow"))
    }

    /// Split the amount into hauler payment and platform fee.
    ///
    /// `fee = floor(amount * percent / 100)`, `payment = amount - fee`.
    /// The two parts always reassemble to the original amount exactly.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `percent > 100` or if the intermediate
    /// product overflows `u128`.
    pub fn fee_split(self, percent: u8) -> Result<FeeSplit, MarketError> {
        if percent > 100 {
            return Err(MarketError::invalid_input(format!(
                "fee percent must be <= 100, got {percent}"
            )));
        }
        let fee = self
            .0
            .checked_mul(u128::from(percent))
            .ok_or_else(|| MarketError::invalid_input("amount too large for fee computation"))?
            / 100;
        Ok(FeeSplit {
            payment: Amount(self.0 - fee),
            fee: Amount(fee),
        })
    }
}

impl FeeSplit {
    /// Reassemble the original escrowed amount. Total never overflows since
    /// both parts came from one `Amount`.
    pub fn total(&self) -> Amount {
        Amount(self.payment.0 + self.fee.0)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
