//! # Eligibility Evaluator
//!
//! Decides whether a purchaser may finance an invoice of a given creditor
//! at a given term, and builds the candidate result for eligible ones.
//!
//! A purchaser is eligible when all four hold:
//!
//! 1. It has settings for the invoice's creditor.
//! 2. The term reaches its minimum financing term.
//! 3. The exact term rate does not exceed the creditor's maximum.
//! 4. The exact term rate does not exceed 10,000 bps, so the discount never
//!    exceeds the invoice value.
//!
//! Rejections are values ([`Ineligibility`]), not errors.

use crate::domain::entities::{Creditor, Purchaser, PurchaserFinancingResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::financing_calculator::{BPS_DIVISOR, FinancingCalculator};
use crate::domain::services::purchaser_pool::PurchaserPool;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Why a purchaser cannot finance an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// No settings for the invoice's creditor.
    NoSettingsForCreditor,
    /// Term shorter than the purchaser's minimum.
    TermBelowMinimum {
        /// Financing term in days.
        term_in_days: i64,
        /// Purchaser's minimum term in days.
        minimum_in_days: i64,
    },
    /// Term rate above the creditor's cap.
    RateAboveCap {
        /// Exact term rate in bps.
        rate_in_bps: Decimal,
        /// Creditor's maximum rate in bps.
        cap_in_bps: i32,
    },
    /// Term rate above 100%, which would discount more than the face value.
    RateAboveFaceValue {
        /// Exact term rate in bps.
        rate_in_bps: Decimal,
    },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSettingsForCreditor => write!(f, "no settings for creditor"),
            Self::TermBelowMinimum {
                term_in_days,
                minimum_in_days,
            } => write!(f, "term {term_in_days}d below minimum {minimum_in_days}d"),
            Self::RateAboveCap {
                rate_in_bps,
                cap_in_bps,
            } => write!(f, "rate {rate_in_bps}bps above cap {cap_in_bps}bps"),
            Self::RateAboveFaceValue { rate_in_bps } => {
                write!(f, "rate {rate_in_bps}bps exceeds face value")
            }
        }
    }
}

/// Applies eligibility rules to purchaser/invoice pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator {
    calculator: FinancingCalculator,
}

impl EligibilityEvaluator {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(calculator: FinancingCalculator) -> Self {
        Self { calculator }
    }

    /// Checks all rules and returns the exact term rate when eligible.
    ///
    /// # Errors
    ///
    /// Returns the first failed rule as an [`Ineligibility`].
    pub fn check(
        &self,
        pool: &PurchaserPool,
        purchaser: &Purchaser,
        creditor: &Creditor,
        financing_term_in_days: i64,
    ) -> Result<Decimal, Ineligibility> {
        let Some(settings) = pool.settings_for(purchaser.id(), creditor.id()) else {
            return Err(Ineligibility::NoSettingsForCreditor);
        };

        if financing_term_in_days < purchaser.minimum_financing_term_in_days() {
            return Err(Ineligibility::TermBelowMinimum {
                term_in_days: financing_term_in_days,
                minimum_in_days: purchaser.minimum_financing_term_in_days(),
            });
        }

        let rate = self
            .calculator
            .financing_rate(settings.annual_rate_in_bps(), financing_term_in_days);
        if rate > Decimal::from(creditor.max_financing_rate_in_bps()) {
            return Err(Ineligibility::RateAboveCap {
                rate_in_bps: rate,
                cap_in_bps: creditor.max_financing_rate_in_bps(),
            });
        }
        if rate > Decimal::from(BPS_DIVISOR) {
            return Err(Ineligibility::RateAboveFaceValue { rate_in_bps: rate });
        }

        Ok(rate)
    }

    /// Returns true if the purchaser may finance at this term.
    #[must_use]
    pub fn is_eligible(
        &self,
        pool: &PurchaserPool,
        purchaser: &Purchaser,
        creditor: &Creditor,
        financing_term_in_days: i64,
    ) -> bool {
        self.check(pool, purchaser, creditor, financing_term_in_days)
            .is_ok()
    }

    /// Builds the candidate result for a purchaser assumed eligible.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingFinancingSettings` if the purchaser has
    /// no settings for the creditor.
    pub fn build_result(
        &self,
        pool: &PurchaserPool,
        purchaser: &Purchaser,
        creditor: &Creditor,
        financing_term_in_days: i64,
        financing_date: NaiveDate,
    ) -> DomainResult<PurchaserFinancingResult> {
        let settings = pool.settings_for(purchaser.id(), creditor.id()).ok_or(
            DomainError::MissingFinancingSettings {
                purchaser: purchaser.id(),
                creditor: creditor.id(),
            },
        )?;
        let exact = self
            .calculator
            .financing_rate(settings.annual_rate_in_bps(), financing_term_in_days);
        Ok(self.result_at(purchaser, exact, financing_term_in_days, financing_date))
    }

    /// Checks eligibility and, if eligible, builds the candidate result.
    ///
    /// Rejections are logged at debug level and yield `None`.
    #[must_use]
    pub fn evaluate(
        &self,
        pool: &PurchaserPool,
        purchaser: &Purchaser,
        creditor: &Creditor,
        financing_term_in_days: i64,
        financing_date: NaiveDate,
    ) -> Option<PurchaserFinancingResult> {
        match self.check(pool, purchaser, creditor, financing_term_in_days) {
            Ok(exact) => Some(self.result_at(
                purchaser,
                exact,
                financing_term_in_days,
                financing_date,
            )),
            Err(reason) => {
                tracing::debug!(
                    purchaser = %purchaser.name(),
                    creditor = %creditor.name(),
                    financing_term_in_days,
                    %reason,
                    "purchaser not eligible"
                );
                None
            }
        }
    }

    fn result_at(
        &self,
        purchaser: &Purchaser,
        exact: Decimal,
        financing_term_in_days: i64,
        financing_date: NaiveDate,
    ) -> PurchaserFinancingResult {
        PurchaserFinancingResult {
            purchaser_id: purchaser.id(),
            financing_rate_in_bps: self.calculator.rounded_rate_in_bps(exact),
            exact_financing_rate: exact,
            financing_term_in_days,
            financing_date,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::PurchaserFinancingSettings;
    use crate::domain::value_objects::{CreditorId, PurchaserId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn creditor(cap: i32) -> Creditor {
        Creditor::new(CreditorId::new_v4(), "Coffee Beans LLC", cap).unwrap()
    }

    fn purchaser(minimum: i64, creditor: &Creditor, annual: i32) -> Purchaser {
        Purchaser::new(PurchaserId::new_v4(), "RichBank", minimum)
            .unwrap()
            .with_settings(PurchaserFinancingSettings::new(creditor.id(), annual))
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn evaluator() -> EligibilityEvaluator {
        EligibilityEvaluator::default()
    }

    mod rules {
        use super::*;

        #[test]
        fn rejects_without_settings() {
            let c = creditor(100);
            let p = Purchaser::new(PurchaserId::new_v4(), "Bare", 0).unwrap();
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert_eq!(
                evaluator().check(&pool, &p, &c, 30),
                Err(Ineligibility::NoSettingsForCreditor)
            );
        }

        #[test]
        fn rejects_short_term() {
            let c = creditor(100);
            let p = purchaser(10, &c, 50);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert_eq!(
                evaluator().check(&pool, &p, &c, 9),
                Err(Ineligibility::TermBelowMinimum {
                    term_in_days: 9,
                    minimum_in_days: 10
                })
            );
            assert!(evaluator().is_eligible(&pool, &p, &c, 10));
        }

        #[test]
        fn rejects_exact_rate_above_cap_even_when_rounded_fits() {
            // 40 * 30 / 360 = 3.33.. rounds to 3, cap is 3
            let c = creditor(3);
            let p = purchaser(0, &c, 40);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert!(matches!(
                evaluator().check(&pool, &p, &c, 30),
                Err(Ineligibility::RateAboveCap { cap_in_bps: 3, .. })
            ));
        }

        #[test]
        fn accepts_rate_equal_to_cap() {
            // 36 * 30 / 360 = 3 exactly
            let c = creditor(3);
            let p = purchaser(0, &c, 36);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert_eq!(evaluator().check(&pool, &p, &c, 30), Ok(dec!(3)));
        }

        #[test]
        fn rejects_rate_above_face_value_under_loose_cap() {
            // 10000 * 720 / 360 = 20000 bps, a discount of twice the value
            let c = creditor(20_000);
            let p = purchaser(0, &c, 10_000);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert_eq!(
                evaluator().check(&pool, &p, &c, 720),
                Err(Ineligibility::RateAboveFaceValue {
                    rate_in_bps: dec!(20000)
                })
            );
            assert_eq!(evaluator().check(&pool, &p, &c, 360), Ok(dec!(10000)));
            assert!(evaluator().evaluate(&pool, &p, &c, 720, today()).is_none());
        }

        #[test]
        fn rejects_matured_invoice() {
            let c = creditor(100);
            let p = purchaser(0, &c, 50);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert!(!evaluator().is_eligible(&pool, &p, &c, -1));
        }
    }

    mod results {
        use super::*;

        #[test]
        fn evaluate_builds_rounded_and_exact_rates() {
            let c = creditor(100);
            let p = purchaser(10, &c, 50);
            let pool = PurchaserPool::new(vec![p.clone()]);

            let result = evaluator().evaluate(&pool, &p, &c, 30, today()).unwrap();

            assert_eq!(result.purchaser_id, p.id());
            assert_eq!(result.financing_rate_in_bps, 4);
            assert_eq!(result.exact_financing_rate, dec!(4.1666666667));
            assert_eq!(result.financing_term_in_days, 30);
            assert_eq!(result.financing_date, today());
        }

        #[test]
        fn evaluate_yields_none_when_ineligible() {
            let c = creditor(100);
            let p = purchaser(40, &c, 50);
            let pool = PurchaserPool::new(vec![p.clone()]);

            assert!(evaluator().evaluate(&pool, &p, &c, 30, today()).is_none());
        }

        #[test]
        fn build_result_requires_settings() {
            let c = creditor(100);
            let p = Purchaser::new(PurchaserId::new_v4(), "Bare", 0).unwrap();
            let pool = PurchaserPool::new(vec![p.clone()]);

            let err = evaluator()
                .build_result(&pool, &p, &c, 30, today())
                .unwrap_err();
            assert!(err.is_contract_violation());
        }
    }

    proptest! {
        #[test]
        fn short_term_rejection_holds_for_shorter_terms(
            minimum in 0i64..400,
            term in -50i64..400,
            shorter_by in 1i64..100,
            annual in 1i32..1_000,
        ) {
            let c = creditor(i32::MAX);
            let p = purchaser(minimum, &c, annual);
            let pool = PurchaserPool::new(vec![p.clone()]);
            let evaluator = evaluator();

            if matches!(
                evaluator.check(&pool, &p, &c, term),
                Err(Ineligibility::TermBelowMinimum { .. })
            ) {
                let still_short = matches!(
                    evaluator.check(&pool, &p, &c, term - shorter_by),
                    Err(Ineligibility::TermBelowMinimum { .. })
                );
                prop_assert!(still_short);
            }
        }

        #[test]
        fn rounded_rate_within_half_bps_of_exact(
            annual in 1i32..1_000,
            term in 1i64..3_600,
        ) {
            let c = creditor(i32::MAX);
            let p = purchaser(0, &c, annual);
            let pool = PurchaserPool::new(vec![p.clone()]);

            let result = evaluator().evaluate(&pool, &p, &c, term, today()).unwrap();
            let diff = (Decimal::from(result.financing_rate_in_bps) - result.exact_financing_rate).abs();
            prop_assert!(diff <= dec!(0.5));
        }
    }
}
