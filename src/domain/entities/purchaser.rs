//! # Purchaser Entity
//!
//! A purchaser (usually a bank) buys invoices early: it pays the creditor now
//! and collects the full face value from the debtor at maturity.
//!
//! Each purchaser owns a set of [`PurchaserFinancingSettings`], at most one
//! per creditor, holding the annual rate it charges that creditor.
//!
//! # Examples
//!
//! ```
//! use invoice_financing::domain::entities::{Purchaser, PurchaserFinancingSettings};
//! use invoice_financing::domain::value_objects::{CreditorId, PurchaserId};
//!
//! let creditor = CreditorId::new_v4();
//! let purchaser = Purchaser::new(PurchaserId::new_v4(), "RichBank", 10)
//!     .unwrap()
//!     .with_settings(PurchaserFinancingSettings::new(creditor, 50))
//!     .unwrap();
//!
//! assert_eq!(purchaser.settings_for(creditor).unwrap().annual_rate_in_bps(), 50);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CreditorId, PurchaserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Financing terms a purchaser offers one creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaserFinancingSettings {
    creditor_id: CreditorId,
    /// Nominal annual rate in bps.
    annual_rate_in_bps: i32,
    /// Cap on aggregate financed exposure to the creditor. Stored, not enforced.
    credit_line_limit_in_cents: Option<i64>,
}

impl PurchaserFinancingSettings {
    /// Creates settings for a creditor at the given annual rate.
    #[must_use]
    pub fn new(creditor_id: CreditorId, annual_rate_in_bps: i32) -> Self {
        Self {
            creditor_id,
            annual_rate_in_bps,
            credit_line_limit_in_cents: None,
        }
    }

    /// Sets the credit line limit.
    #[must_use]
    pub fn with_credit_line_limit(mut self, limit_in_cents: i64) -> Self {
        self.credit_line_limit_in_cents = Some(limit_in_cents);
        self
    }

    /// Returns the creditor these settings apply to.
    #[inline]
    #[must_use]
    pub fn creditor_id(&self) -> CreditorId {
        self.creditor_id
    }

    /// Returns the annual rate in bps.
    #[inline]
    #[must_use]
    pub fn annual_rate_in_bps(&self) -> i32 {
        self.annual_rate_in_bps
    }

    /// Returns the credit line limit, if any.
    #[inline]
    #[must_use]
    pub fn credit_line_limit_in_cents(&self) -> Option<i64> {
        self.credit_line_limit_in_cents
    }
}

/// A buyer of invoices.
///
/// # Invariants
///
/// - `name` is not blank
/// - `minimum_financing_term_in_days` is non-negative
/// - at most one settings entry per creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchaser {
    id: PurchaserId,
    name: String,
    minimum_financing_term_in_days: i64,
    settings: Vec<PurchaserFinancingSettings>,
}

impl Purchaser {
    /// Creates a purchaser with no settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidName` if `name` is blank, or
    /// `DomainError::InvalidMinimumTerm` if the minimum term is negative.
    pub fn new(
        id: PurchaserId,
        name: impl Into<String>,
        minimum_financing_term_in_days: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_name("purchaser name must not be empty"));
        }
        if minimum_financing_term_in_days < 0 {
            return Err(DomainError::InvalidMinimumTerm(
                minimum_financing_term_in_days,
            ));
        }
        Ok(Self {
            id,
            name,
            minimum_financing_term_in_days,
            settings: Vec::new(),
        })
    }

    /// Creates a purchaser without validation (for reconstruction from storage).
    #[must_use]
    pub fn from_parts(
        id: PurchaserId,
        name: String,
        minimum_financing_term_in_days: i64,
        settings: Vec<PurchaserFinancingSettings>,
    ) -> Self {
        Self {
            id,
            name,
            minimum_financing_term_in_days,
            settings,
        }
    }

    /// Adds a settings entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateSettings` if the purchaser already has
    /// settings for the same creditor.
    pub fn with_settings(mut self, settings: PurchaserFinancingSettings) -> DomainResult<Self> {
        if self.settings_for(settings.creditor_id()).is_some() {
            return Err(DomainError::DuplicateSettings {
                purchaser: self.id,
                creditor: settings.creditor_id(),
            });
        }
        self.settings.push(settings);
        Ok(self)
    }

    /// Returns the purchaser ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> PurchaserId {
        self.id
    }

    /// Returns the purchaser name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shortest term, in days, the purchaser will finance.
    #[inline]
    #[must_use]
    pub fn minimum_financing_term_in_days(&self) -> i64 {
        self.minimum_financing_term_in_days
    }

    /// Returns all settings entries.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &[PurchaserFinancingSettings] {
        &self.settings
    }

    /// Finds the settings entry for a creditor by linear scan.
    ///
    /// Per-run lookups go through
    /// [`PurchaserPool`](crate::domain::services::PurchaserPool) instead.
    #[must_use]
    pub fn settings_for(&self, creditor_id: CreditorId) -> Option<&PurchaserFinancingSettings> {
        self.settings
            .iter()
            .find(|s| s.creditor_id() == creditor_id)
    }
}

impl fmt::Display for Purchaser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Purchaser({}, min_term={}d, creditors={})",
            self.name,
            self.minimum_financing_term_in_days,
            self.settings.len()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn rejects_blank_name() {
            let result = Purchaser::new(PurchaserId::new_v4(), "", 10);
            assert!(matches!(result, Err(DomainError::InvalidName(_))));
        }

        #[test]
        fn rejects_negative_minimum_term() {
            let result = Purchaser::new(PurchaserId::new_v4(), "FatBank", -1);
            assert!(matches!(result, Err(DomainError::InvalidMinimumTerm(-1))));
        }

        #[test]
        fn rejects_duplicate_creditor_settings() {
            let creditor = CreditorId::new_v4();
            let result = Purchaser::new(PurchaserId::new_v4(), "FatBank", 12)
                .unwrap()
                .with_settings(PurchaserFinancingSettings::new(creditor, 40))
                .unwrap()
                .with_settings(PurchaserFinancingSettings::new(creditor, 80));
            assert!(matches!(result, Err(DomainError::DuplicateSettings { .. })));
        }
    }

    mod settings {
        use super::*;

        #[test]
        fn settings_for_matches_by_creditor_identity() {
            let first = CreditorId::new_v4();
            let second = CreditorId::new_v4();
            let purchaser = Purchaser::new(PurchaserId::new_v4(), "MegaBank", 8)
                .unwrap()
                .with_settings(PurchaserFinancingSettings::new(first, 50))
                .unwrap()
                .with_settings(
                    PurchaserFinancingSettings::new(second, 45).with_credit_line_limit(1_000_000),
                )
                .unwrap();

            assert_eq!(purchaser.settings().len(), 2);
            assert_eq!(purchaser.settings_for(first).unwrap().annual_rate_in_bps(), 50);
            let other = purchaser.settings_for(second).unwrap();
            assert_eq!(other.credit_line_limit_in_cents(), Some(1_000_000));
            assert!(purchaser.settings_for(CreditorId::new_v4()).is_none());
        }

        #[test]
        fn display_mentions_name() {
            let purchaser = Purchaser::new(PurchaserId::new_v4(), "RichBank", 10).unwrap();
            assert!(purchaser.to_string().contains("RichBank"));
        }
    }
}
