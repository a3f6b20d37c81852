//! # Purchaser Financing Result
//!
//! The transient outcome of evaluating one purchaser against one invoice.
//! Created and consumed within a single invoice's evaluation; never stored.

use crate::domain::value_objects::PurchaserId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A candidate (or winning) purchaser with the economics it would apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaserFinancingResult {
    /// The purchaser.
    pub purchaser_id: PurchaserId,
    /// Term rate rounded half-up to whole bps; the applied rate.
    pub financing_rate_in_bps: i32,
    /// Unrounded term rate, used to break ties between equal rounded rates.
    pub exact_financing_rate: Decimal,
    /// Days between financing date and maturity.
    pub financing_term_in_days: i64,
    /// Date the financing is applied.
    pub financing_date: NaiveDate,
}

impl PurchaserFinancingResult {
    /// Orders results cheapest-first: rounded rate, then exact rate, then
    /// purchaser identity.
    #[must_use]
    pub fn cmp_by_cost(&self, other: &Self) -> Ordering {
        self.financing_rate_in_bps
            .cmp(&other.financing_rate_in_bps)
            .then_with(|| self.exact_financing_rate.cmp(&other.exact_financing_rate))
            .then_with(|| self.purchaser_id.cmp(&other.purchaser_id))
    }
}

impl fmt::Display for PurchaserFinancingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FinancingResult(purchaser={}, rate={}bps, exact={}, term={}d)",
            self.purchaser_id,
            self.financing_rate_in_bps,
            self.exact_financing_rate,
            self.financing_term_in_days
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn result(id: u128, rounded: i32, exact: Decimal) -> PurchaserFinancingResult {
        PurchaserFinancingResult {
            purchaser_id: PurchaserId::new(Uuid::from_u128(id)),
            financing_rate_in_bps: rounded,
            exact_financing_rate: exact,
            financing_term_in_days: 30,
            financing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn rounded_rate_dominates() {
        let cheap = result(2, 3, dec!(3.4));
        let dear = result(1, 4, dec!(3.6));
        assert_eq!(cheap.cmp_by_cost(&dear), Ordering::Less);
    }

    #[test]
    fn exact_rate_breaks_ties() {
        let lower = result(2, 3, dec!(3.3333333333));
        let higher = result(1, 3, dec!(3.4166666667));
        assert_eq!(lower.cmp_by_cost(&higher), Ordering::Less);
        assert_eq!(higher.cmp_by_cost(&lower), Ordering::Greater);
    }

    #[test]
    fn identity_breaks_full_ties() {
        let a = result(1, 3, dec!(3.25));
        let b = result(2, 3, dec!(3.25));
        assert_eq!(a.cmp_by_cost(&b), Ordering::Less);
    }
}
