//! # Financing Calculator
//!
//! Pure fixed-point arithmetic for invoice financing: term, term rate,
//! discount, and early payment.
//!
//! Rates are scaled from an annual basis to the financing term using a
//! 360-day financial year. All intermediate values are `Decimal` with an
//! explicit half-up rounding step, so the same inputs produce the same cents
//! on every run.
//!
//! # Examples
//!
//! ```
//! use invoice_financing::domain::services::FinancingCalculator;
//! use rust_decimal::Decimal;
//!
//! let calc = FinancingCalculator::new();
//! let rate = calc.financing_rate(50, 30);
//! assert_eq!(rate, Decimal::new(41_666_666_667, 10));
//! assert_eq!(calc.rounded_rate_in_bps(rate), 4);
//! ```

use crate::domain::entities::FinancingAmounts;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{
    round_half_up, to_whole_cents, ArithmeticResult, CheckedArithmetic, AMOUNT_SCALE,
    CALCULATION_SCALE,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Days in the financial year used to scale annual rates.
pub const DAYS_IN_FINANCIAL_YEAR: i64 = 360;

/// Basis points per unit.
pub const BPS_DIVISOR: i64 = 10_000;

/// Stateless calculator for financing economics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancingCalculator;

impl FinancingCalculator {
    /// Creates a new calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Calendar days from `financing_date` to `maturity_date`.
    ///
    /// Negative when maturity has already passed.
    #[must_use]
    pub fn financing_term(&self, financing_date: NaiveDate, maturity_date: NaiveDate) -> i64 {
        (maturity_date - financing_date).num_days()
    }

    /// Annual rate scaled to the term: `annual * term / 360`, rounded half-up
    /// to 10 fractional digits.
    ///
    /// Returns zero when either input is not positive.
    #[must_use]
    pub fn financing_rate(&self, annual_rate_in_bps: i32, financing_term_in_days: i64) -> Decimal {
        if annual_rate_in_bps <= 0 || financing_term_in_days <= 0 {
            tracing::warn!(
                annual_rate_in_bps,
                financing_term_in_days,
                "invalid input for financing rate calculation"
            );
            return Decimal::ZERO;
        }

        // |i32 * i64| < 2^95, within Decimal's 96-bit mantissa
        let scaled = Decimal::from(annual_rate_in_bps) * Decimal::from(financing_term_in_days)
            / Decimal::from(DAYS_IN_FINANCIAL_YEAR);
        round_half_up(scaled, CALCULATION_SCALE)
    }

    /// Rounds a term rate half-up to whole bps.
    ///
    /// Saturates at `i32::MAX`; such a rate exceeds any creditor cap.
    #[must_use]
    pub fn rounded_rate_in_bps(&self, rate_in_bps: Decimal) -> i32 {
        round_half_up(rate_in_bps, 0).to_i32().unwrap_or(i32::MAX)
    }

    /// Discount earned by the purchaser: `value * rate / 10000`, rounded
    /// half-up to 6 fractional cents.
    ///
    /// Returns zero when either input is not positive.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the product does not fit.
    pub fn discount_amount(
        &self,
        value_in_cents: i64,
        rate_in_bps: Decimal,
    ) -> ArithmeticResult<Decimal> {
        if value_in_cents <= 0 || rate_in_bps <= Decimal::ZERO {
            tracing::warn!(
                value_in_cents,
                %rate_in_bps,
                "invalid input for discount calculation"
            );
            return Ok(Decimal::ZERO);
        }

        let discount = Decimal::from(value_in_cents)
            .safe_mul(rate_in_bps)?
            .safe_div(Decimal::from(BPS_DIVISOR))?;
        Ok(round_half_up(discount, AMOUNT_SCALE))
    }

    /// Cash paid to the creditor now: `value - discount`, at 6 fractional cents.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the discount computation overflows.
    pub fn early_payment_amount(
        &self,
        value_in_cents: i64,
        rate_in_bps: Decimal,
    ) -> ArithmeticResult<Decimal> {
        let discount = self.discount_amount(value_in_cents, rate_in_bps)?;
        let early = Decimal::from(value_in_cents).safe_sub(discount)?;
        Ok(round_half_up(early, AMOUNT_SCALE))
    }

    /// Whole-cent amounts to persist for an invoice financed at `rate_in_bps`.
    ///
    /// The discount is rounded half-up to whole cents and the early payment
    /// takes the remainder, so both always sum to the face value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow, or
    /// `DomainError::InvalidAmounts` if the discount would exceed the value.
    pub fn financing_amounts(
        &self,
        value_in_cents: i64,
        rate_in_bps: i32,
    ) -> DomainResult<FinancingAmounts> {
        let discount = self.discount_amount(value_in_cents, Decimal::from(rate_in_bps))?;
        FinancingAmounts::split(value_in_cents, to_whole_cents(discount)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn calc() -> FinancingCalculator {
        FinancingCalculator::new()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod term {
        use super::*;

        #[test]
        fn counts_calendar_days() {
            assert_eq!(calc().financing_term(date(2023, 1, 1), date(2023, 1, 31)), 30);
        }

        #[test]
        fn crosses_leap_day() {
            assert_eq!(calc().financing_term(date(2024, 2, 28), date(2024, 3, 1)), 2);
        }

        #[test]
        fn negative_when_matured() {
            assert_eq!(calc().financing_term(date(2023, 1, 31), date(2023, 1, 1)), -30);
        }
    }

    mod rate {
        use super::*;

        #[test]
        fn scales_annual_rate_to_term() {
            assert_eq!(calc().financing_rate(50, 30), dec!(4.1666666667));
            assert_eq!(calc().financing_rate(40, 30), dec!(3.3333333333));
            assert_eq!(calc().financing_rate(360, 90), dec!(90));
        }

        #[test]
        fn rounds_to_whole_bps_half_up() {
            assert_eq!(calc().rounded_rate_in_bps(dec!(4.1666666667)), 4);
            assert_eq!(calc().rounded_rate_in_bps(dec!(3.3333333333)), 3);
            assert_eq!(calc().rounded_rate_in_bps(dec!(2.5)), 3);
        }

        #[test]
        fn zero_for_non_positive_inputs() {
            assert_eq!(calc().financing_rate(0, 30), Decimal::ZERO);
            assert_eq!(calc().financing_rate(-50, 30), Decimal::ZERO);
            assert_eq!(calc().financing_rate(50, 0), Decimal::ZERO);
            assert_eq!(calc().financing_rate(50, -30), Decimal::ZERO);
        }

        #[test]
        fn extreme_inputs_do_not_overflow() {
            let rate = calc().financing_rate(i32::MAX, i64::MAX);
            assert!(rate > Decimal::ZERO);
            assert_eq!(calc().rounded_rate_in_bps(rate), i32::MAX);
        }
    }

    mod amounts {
        use super::*;

        #[test]
        fn discount_for_whole_bps() {
            assert_eq!(calc().discount_amount(1_000_000, dec!(4)).unwrap(), dec!(400));
            assert_eq!(calc().discount_amount(100_000_000, dec!(1)).unwrap(), dec!(10000));
        }

        #[test]
        fn discount_keeps_six_fractional_digits() {
            let discount = calc().discount_amount(12_345, dec!(4.1666666667)).unwrap();
            assert_eq!(discount, dec!(5.143750));
        }

        #[test]
        fn discount_zero_for_non_positive_inputs() {
            assert_eq!(calc().discount_amount(1_000_000, dec!(0)).unwrap(), Decimal::ZERO);
            assert_eq!(calc().discount_amount(-1_000_000, dec!(4)).unwrap(), Decimal::ZERO);
        }

        #[test]
        fn early_payment_is_value_minus_discount() {
            assert_eq!(
                calc().early_payment_amount(1_000_000, dec!(3)).unwrap(),
                dec!(999700)
            );
        }

        #[test]
        fn whole_cent_amounts_sum_to_value() {
            let amounts = calc().financing_amounts(1_000_000, 3).unwrap();
            assert_eq!(amounts.discounted_amount_in_cents(), 300);
            assert_eq!(amounts.early_payment_amount_in_cents(), 999_700);
        }

        #[test]
        fn whole_cent_discount_rounds_half_up() {
            // 12_350 * 4 / 10_000 = 4.94
            let amounts = calc().financing_amounts(12_350, 4).unwrap();
            assert_eq!(amounts.discounted_amount_in_cents(), 5);
            assert_eq!(amounts.early_payment_amount_in_cents(), 12_345);

            // 125 * 4 / 10_000 = 0.05
            let small = calc().financing_amounts(125, 4).unwrap();
            assert_eq!(small.discounted_amount_in_cents(), 0);
            assert_eq!(small.early_payment_amount_in_cents(), 125);
        }

        #[test]
        fn zero_rate_keeps_full_value() {
            let amounts = calc().financing_amounts(1_000, 0).unwrap();
            assert_eq!(amounts.discounted_amount_in_cents(), 0);
            assert_eq!(amounts.early_payment_amount_in_cents(), 1_000);
        }
    }
}
