//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart summing float prices drifts by a cent after enough lines,      │
//! │  and the persisted order total no longer matches the on-screen one.   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    9.50 € is stored as 950. Sums are exact. The cart summary and       │
//! │    the persisted order compute the same total, always.                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(950); // 9.50 €
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // 19.00 €
//! let total = price + Money::from_cents(150);  // 11.00 €
//!
//! // NEVER do this:
//! // let bad = Money::from_float(9.50); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Survives subtraction in intermediate math without wrapping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_cents ──► OptionResolver (base + extras)                │
/// │                                │                                        │
/// │                                ▼                                        │
/// │  CartLineItem.final_price ──► Cart.total_price() (subtotal)            │
/// │                                │                                        │
/// │                                ▼                                        │
/// │  OrderTotals (subtotal + VAT) ──► Order.total_price_cents              │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(950); // Represents 9.50 €
    /// assert_eq!(price.cents(), 950);
    /// ```
    ///
    /// ## Why Cents?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use cents.
    /// Only the UI converts to euros for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (euros and cents).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_major_minor(9, 50); // 9.50 €
    /// assert_eq!(price.cents(), 950);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1250);
    /// assert_eq!(price.euros(), 12);
    /// ```
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.cents(), 0);
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates VAT on this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math: `(amount_cents * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2000); // 20.00 €
    /// let rate = TaxRate::from_bps(2000);     // 20% French VAT
    ///
    /// let vat = subtotal.calculate_tax(rate);
    /// assert_eq!(vat.cents(), 400);           // 4.00 €
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Cart subtotal: 20.00 €
    ///      │
    ///      ▼
    /// calculate_tax(20%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// VAT: 4.00 €
    ///      │
    ///      ▼
    /// Order total: 24.00 €
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // Use i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 2000 = 20%
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(500); // 5.00 €
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 1000);    // 10.00 €
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// The three figures every order screen and every persisted order share:
/// subtotal, VAT, and grand total.
///
/// Computed in exactly one place so the cart summary can never disagree
/// with the stored `Order.total_price_cents`.
///
/// ## Example
/// ```rust
/// use bistro_core::money::{Money, OrderTotals};
/// use bistro_core::types::TaxRate;
///
/// let totals = OrderTotals::from_subtotal(Money::from_cents(2000), TaxRate::from_bps(2000));
/// assert_eq!(totals.subtotal.cents(), 2000); // 20.00 €
/// assert_eq!(totals.tax.cents(), 400);       //  4.00 €
/// assert_eq!(totals.total.cents(), 2400);    // 24.00 €
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    /// Sum of `final_price × quantity` over all cart lines.
    pub subtotal: Money,
    /// VAT computed on the subtotal.
    pub tax: Money,
    /// `subtotal + tax`.
    pub total: Money,
}

impl OrderTotals {
    /// Derives VAT and grand total from a subtotal at the given rate.
    pub fn from_subtotal(subtotal: Money, rate: TaxRate) -> Self {
        let tax = subtotal.calculate_tax(rate);
        OrderTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money the way the app prints it: "12.50 €".
///
/// ## Note
/// This is for receipts, logs and debugging. The frontend owns true
/// localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} €", sign, self.euros().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1250);
        assert_eq!(money.cents(), 1250);
        assert_eq!(money.euros(), 12);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(9, 50);
        assert_eq!(money.cents(), 950);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99 €");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00 €");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00 €");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50 €");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_vat_at_twenty_percent() {
        // 20.00 € at 20% VAT = 4.00 €
        let amount = Money::from_cents(2000);
        let rate = TaxRate::from_bps(2000);
        let tax = amount.calculate_tax(rate);
        assert_eq!(tax.cents(), 400);
    }

    #[test]
    fn test_vat_rounding() {
        // 0.99 € at 20% = 0.198 € → rounds to 0.20 €
        let amount = Money::from_cents(99);
        let rate = TaxRate::from_bps(2000);
        assert_eq!(amount.calculate_tax(rate).cents(), 20);

        // 0.02 € at 20% = 0.004 € → rounds to 0.00 €
        let tiny = Money::from_cents(2);
        assert_eq!(tiny.calculate_tax(rate).cents(), 0);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(500);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.cents(), 1000);
    }

    #[test]
    fn test_order_totals() {
        // The canonical checkout example: subtotal 20.00 → VAT 4.00 → total 24.00
        let totals = OrderTotals::from_subtotal(Money::from_cents(2000), TaxRate::from_bps(2000));
        assert_eq!(totals.subtotal.cents(), 2000);
        assert_eq!(totals.tax.cents(), 400);
        assert_eq!(totals.total.cents(), 2400);
    }

    #[test]
    fn test_order_totals_zero_subtotal() {
        let totals = OrderTotals::from_subtotal(Money::zero(), TaxRate::from_bps(2000));
        assert_eq!(totals.total.cents(), 0);
    }
}
