//! # Tax Module
//!
//! Back-calculation of tax from tax-inclusive prices.
//!
//! ## Inclusive Pricing Explained
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tax-Inclusive Back-Calculation                       │
//! │                                                                         │
//! │  A sale price of 118.00 at 18% GST already CONTAINS the tax:           │
//! │                                                                         │
//! │      base  = P / (1 + R/100)  = 118.00 / 1.18 = 100.00                 │
//! │      tax   = P - base         =  18.00                                 │
//! │      line  = P × quantity     = 118.00  (customer pays the sticker)    │
//! │                                                                         │
//! │  Tax is backed OUT of the price, never added on top.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per-line tax is rarely a whole number of cents.                        │
//! │                                                                         │
//! │  ❌ WRONG: round each line to cents, then sum                           │
//! │     30 lines × 0.4 cent error = up to 12 cents of drift                │
//! │                                                                         │
//! │  ✅ CORRECT: carry lines in micro-cents, round ONCE at the aggregate    │
//! │     Invoice.tax_amount is rounded to currency precision exactly once.  │
//! │                                                                         │
//! │  All math is integral (i128 micro-cents); no floating point anywhere.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::{Money, TaxRate};

/// Micro-cents per cent. Lines are accumulated at this precision and the
/// aggregate is rounded to whole cents exactly once.
const MICROS_PER_CENT: i128 = 1_000_000;

/// Tax contained in one unit at an inclusive price, in micro-cents.
///
/// For inclusive price `P` cents and rate `r` bps:
/// `unit_tax = P × r / (10000 + r)`.
///
/// ## Example
/// ```rust
/// use partsdesk_core::money::{Money, TaxRate};
/// use partsdesk_core::tax::unit_tax_micros;
///
/// // 118.00 at 18% contains exactly 18.00 of tax
/// let micros = unit_tax_micros(Money::from_cents(11800), TaxRate::from_bps(1800));
/// assert_eq!(micros, 18_00 * 1_000_000);
/// ```
pub fn unit_tax_micros(unit_price: Money, rate: TaxRate) -> i128 {
    line_tax_micros(unit_price, rate, 1)
}

/// Base (tax-free) portion of one unit at an inclusive price, in micro-cents.
pub fn unit_base_micros(unit_price: Money, rate: TaxRate) -> i128 {
    unit_price.cents() as i128 * MICROS_PER_CENT - unit_tax_micros(unit_price, rate)
}

/// Tax contained in a whole line (unit price × quantity), in micro-cents.
///
/// The division rounds half-up at micro-cent precision, so the residual
/// error per line is below half a micro-cent and can never surface in a
/// cent-rounded aggregate for realistic invoice sizes.
pub fn line_tax_micros(unit_price: Money, rate: TaxRate, quantity: i64) -> i128 {
    if rate.is_zero() || unit_price.is_zero() || quantity == 0 {
        return 0;
    }

    let denom = 10_000_i128 + rate.bps() as i128;
    let numer = unit_price.cents() as i128 * quantity as i128 * rate.bps() as i128 * MICROS_PER_CENT;
    (numer + denom / 2) / denom
}

// =============================================================================
// Tax Breakdown Accumulator
// =============================================================================

/// Aggregates line amounts and back-calculated tax across an order.
///
/// Inputs are bounded upstream by [`crate::validation::validate_order`]
/// (price, quantity, and line-count caps), which keeps the cent total
/// inside `i64` and the micro-cent tax sum far inside `i128`.
///
/// ## Usage
/// ```rust
/// use partsdesk_core::money::{Money, TaxRate};
/// use partsdesk_core::tax::TaxBreakdown;
///
/// let mut totals = TaxBreakdown::new();
/// totals.add_line(Money::from_cents(11800), TaxRate::from_bps(1800), 2);
/// totals.add_line(Money::from_cents(500), TaxRate::zero(), 1);
///
/// assert_eq!(totals.total().cents(), 24100);    // 2 × 118.00 + 5.00
/// assert_eq!(totals.tax_total().cents(), 3600); // 2 × 18.00
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxBreakdown {
    total_cents: i64,
    tax_micros: i128,
    lines: usize,
}

impl TaxBreakdown {
    /// Creates an empty breakdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one line: inclusive unit price, tax rate, quantity.
    ///
    /// The line amount is `unit_price × quantity` exactly (prices already
    /// include tax); the line's tax share is accumulated in micro-cents.
    pub fn add_line(&mut self, unit_price: Money, rate: TaxRate, quantity: i64) {
        self.total_cents += unit_price.multiply_quantity(quantity).cents();
        self.tax_micros += line_tax_micros(unit_price, rate, quantity);
        self.lines += 1;
    }

    /// Invoice total: the exact sum of line amounts, no rounding needed.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Invoice tax: the micro-cent sum rounded to cents, half-up.
    ///
    /// This is the ONLY place tax is rounded to currency precision.
    pub fn tax_total(&self) -> Money {
        let cents = (self.tax_micros + MICROS_PER_CENT / 2) / MICROS_PER_CENT;
        Money::from_cents(cents as i64)
    }

    /// Number of lines accumulated so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_calculation_exact_case() {
        // 118.00 at 18%: base 100.00, tax 18.00, line amount 118.00
        let price = Money::from_cents(11800);
        let rate = TaxRate::from_bps(1800);

        assert_eq!(unit_tax_micros(price, rate), 1800 * MICROS_PER_CENT);
        assert_eq!(unit_base_micros(price, rate), 10000 * MICROS_PER_CENT);

        let mut totals = TaxBreakdown::new();
        totals.add_line(price, rate, 1);
        assert_eq!(totals.total().cents(), 11800);
        assert_eq!(totals.tax_total().cents(), 1800);
    }

    #[test]
    fn test_zero_rate_contributes_no_tax() {
        let mut totals = TaxBreakdown::new();
        totals.add_line(Money::from_cents(999), TaxRate::zero(), 5);

        assert_eq!(totals.total().cents(), 4995);
        assert_eq!(totals.tax_total().cents(), 0);
    }

    #[test]
    fn test_quantity_scales_tax_linearly() {
        let price = Money::from_cents(11800);
        let rate = TaxRate::from_bps(1800);

        let mut totals = TaxBreakdown::new();
        totals.add_line(price, rate, 7);

        assert_eq!(totals.total().cents(), 7 * 11800);
        assert_eq!(totals.tax_total().cents(), 7 * 1800);
    }

    #[test]
    fn test_aggregate_rounding_beats_per_line_rounding() {
        // 1.00 at 18% contains 15.254 cents of tax per unit.
        // Per-line cent rounding would give 15 + 15 + 15 = 45.
        // The correct aggregate is round(3 × 15.254) = 46.
        let price = Money::from_cents(100);
        let rate = TaxRate::from_bps(1800);

        let mut totals = TaxBreakdown::new();
        totals.add_line(price, rate, 1);
        totals.add_line(price, rate, 1);
        totals.add_line(price, rate, 1);

        assert_eq!(totals.line_count(), 3);
        assert_eq!(totals.tax_total().cents(), 46);
    }

    #[test]
    fn test_mixed_rates_accumulate() {
        let mut totals = TaxBreakdown::new();
        totals.add_line(Money::from_cents(11800), TaxRate::from_bps(1800), 2);
        totals.add_line(Money::from_cents(500), TaxRate::zero(), 1);

        assert_eq!(totals.total().cents(), 24100);
        assert_eq!(totals.tax_total().cents(), 3600);
    }

    #[test]
    fn test_tax_never_exceeds_total() {
        // Even at the 100% cap, inclusive tax is half the sticker price.
        let price = Money::from_cents(997);
        let rate = TaxRate::from_bps(10_000);

        let mut totals = TaxBreakdown::new();
        totals.add_line(price, rate, 3);

        assert!(totals.tax_total().cents() <= totals.total().cents());
    }

    #[test]
    fn test_arithmetic_holds_at_validation_bounds() {
        // The largest order validation will admit: max price, max
        // quantity, max rate, max line count. Totals must stay exact.
        let price = Money::from_cents(crate::MAX_UNIT_PRICE_CENTS);
        let rate = TaxRate::from_bps(crate::MAX_TAX_RATE_BPS);

        let mut totals = TaxBreakdown::new();
        for _ in 0..crate::MAX_ORDER_LINES {
            totals.add_line(price, rate, crate::MAX_LINE_QUANTITY);
        }

        let expected_total =
            crate::MAX_UNIT_PRICE_CENTS * crate::MAX_LINE_QUANTITY * crate::MAX_ORDER_LINES as i64;
        assert_eq!(totals.total().cents(), expected_total);
        // Inclusive tax at 100% is exactly half the sticker price.
        assert_eq!(totals.tax_total().cents(), expected_total / 2);
    }

    #[test]
    fn test_empty_breakdown_is_zero() {
        let totals = TaxBreakdown::new();
        assert!(totals.total().is_zero());
        assert!(totals.tax_total().is_zero());
        assert_eq!(totals.line_count(), 0);
    }
}
