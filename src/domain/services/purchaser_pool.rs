//! # Purchaser Pool
//!
//! Run-scoped snapshot of all purchasers with their settings indexed by
//! `(purchaser, creditor)`, so each eligibility check is a constant-time
//! lookup rather than a scan of the purchaser's settings.

use crate::domain::entities::{Purchaser, PurchaserFinancingSettings};
use crate::domain::value_objects::{CreditorId, PurchaserId};
use std::collections::HashMap;

/// Purchasers loaded once per financing run.
#[derive(Debug, Clone, Default)]
pub struct PurchaserPool {
    purchasers: Vec<Purchaser>,
    index: HashMap<PurchaserId, usize>,
    settings: HashMap<(PurchaserId, CreditorId), PurchaserFinancingSettings>,
}

impl PurchaserPool {
    /// Builds the pool from loaded purchasers.
    ///
    /// Purchasers keep their load order. If a purchaser somehow carries two
    /// settings for the same creditor, the first one wins.
    #[must_use]
    pub fn new(purchasers: Vec<Purchaser>) -> Self {
        let mut index = HashMap::with_capacity(purchasers.len());
        let mut settings = HashMap::new();

        for (position, purchaser) in purchasers.iter().enumerate() {
            index.entry(purchaser.id()).or_insert(position);
            for entry in purchaser.settings() {
                settings
                    .entry((purchaser.id(), entry.creditor_id()))
                    .or_insert(*entry);
            }
        }

        Self {
            purchasers,
            index,
            settings,
        }
    }

    /// Returns all purchasers in load order.
    #[inline]
    #[must_use]
    pub fn purchasers(&self) -> &[Purchaser] {
        &self.purchasers
    }

    /// Looks up a purchaser by id.
    #[must_use]
    pub fn get(&self, id: PurchaserId) -> Option<&Purchaser> {
        self.index
            .get(&id)
            .and_then(|&position| self.purchasers.get(position))
    }

    /// Returns the settings `purchaser` holds for `creditor`, if any.
    #[inline]
    #[must_use]
    pub fn settings_for(
        &self,
        purchaser: PurchaserId,
        creditor: CreditorId,
    ) -> Option<&PurchaserFinancingSettings> {
        self.settings.get(&(purchaser, creditor))
    }

    /// Returns the number of purchasers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.purchasers.len()
    }

    /// Returns true if no purchasers were loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchasers.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn purchaser(name: &str, settings: &[(CreditorId, i32)]) -> Purchaser {
        settings.iter().fold(
            Purchaser::new(PurchaserId::new_v4(), name, 10).unwrap(),
            |p, &(creditor, rate)| {
                p.with_settings(PurchaserFinancingSettings::new(creditor, rate))
                    .unwrap()
            },
        )
    }

    #[test]
    fn empty_pool() {
        let pool = PurchaserPool::new(Vec::new());
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn indexes_settings_per_pair() {
        let c1 = CreditorId::new_v4();
        let c2 = CreditorId::new_v4();
        let rich = purchaser("RichBank", &[(c1, 50), (c2, 60)]);
        let fat = purchaser("FatBank", &[(c1, 40)]);
        let (rich_id, fat_id) = (rich.id(), fat.id());

        let pool = PurchaserPool::new(vec![rich, fat]);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.settings_for(rich_id, c2).unwrap().annual_rate_in_bps(), 60);
        assert_eq!(pool.settings_for(fat_id, c1).unwrap().annual_rate_in_bps(), 40);
        assert!(pool.settings_for(fat_id, c2).is_none());
    }

    #[test]
    fn keeps_load_order_and_lookup() {
        let a = purchaser("A", &[]);
        let b = purchaser("B", &[]);
        let b_id = b.id();

        let pool = PurchaserPool::new(vec![a, b]);

        let names: Vec<_> = pool.purchasers().iter().map(Purchaser::name).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(pool.get(b_id).unwrap().name(), "B");
        assert!(pool.get(PurchaserId::new_v4()).is_none());
    }
}
