//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Stored sales carry amounts as JSON numbers (150, 12.5, 0.1).          │
//! │  Summing them as floats drifts:                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cents inside, currency units at the edges       │
//! │    JSON 12.5  ──► Money(1250) ──► sums ──► JSON 12.5                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use duka_core::money::Money;
//!
//! let cost = Money::from_cents(10_000); // Ksh 100.00
//! let sale = Money::from_units(150.0).unwrap();
//! assert_eq!((sale - cost).cents(), 5_000);
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Largest amount, in currency units, accepted from stored or typed input.
pub const MAX_UNITS: f64 = 1e13;

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit/loss figures are routinely negative
/// - **Serialized as currency units**: stored documents keep the shape the
///   recording forms wrote (`"totalSale": 150`), so exporting a normalized
///   record set does not change how amounts look
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a JSON-style currency amount (e.g. `12.5`) to Money.
    ///
    /// Rounds half away from zero to the nearest cent. Returns `None` for
    /// NaN, infinities and amounts beyond [`MAX_UNITS`].
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(12.5).unwrap().cents(), 1250);
    /// assert_eq!(Money::from_units(0.1 + 0.2).unwrap().cents(), 30);
    /// assert!(Money::from_units(f64::NAN).is_none());
    /// assert!(Money::from_units(1e14).is_none());
    /// ```
    pub fn from_units(units: f64) -> Option<Self> {
        if !units.is_finite() || units.abs() > MAX_UNITS {
            return None;
        }
        Some(Money((units * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the magnitude in cents. Defined for every value, `i64::MIN`
    /// included.
    #[inline]
    pub const fn unsigned_cents(&self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Returns the value in currency units, for charting and JSON output.
    #[inline]
    pub fn as_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
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

}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds. Totals over stored documents must
// never panic, whatever the documents hold.

/// Plain decimal rendering (`-12.50`). Use [`CurrencyFormat`] for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().unsigned_abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Serde: currency units on the wire
// =============================================================================

/// Whole amounts serialize as integers (`150`), others as floats (`12.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.as_units())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(deserializer)?;
        Money::from_units(units)
            .ok_or_else(|| D::Error::custom(format!("amount out of range: {units}")))
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Display formatting for amounts (`Ksh 1,234.50`).
///
/// ## Example
/// ```rust
/// use duka_core::money::{CurrencyFormat, Money};
///
/// let fmt = CurrencyFormat::default();
/// assert_eq!(fmt.format(Money::from_cents(123_450)), "Ksh 1,234.50");
/// assert_eq!(fmt.format(Money::from_cents(-5_000)), "-Ksh 50.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount, separated by a space.
    pub symbol: String,

    /// Fraction digits shown (0-2). Money holds cents, so more is meaningless.
    pub decimals: u8,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "Ksh".to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormat {
    /// Creates a format with the given symbol and fraction digits (capped at 2).
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            decimals: decimals.min(2),
        }
    }

    /// Formats an amount with thousands separators.
    pub fn format(&self, amount: Money) -> String {
        let decimals = u32::from(self.decimals.min(2));
        let scale = 10_u64.pow(2 - decimals);
        let rounded = (amount.unsigned_cents() + scale / 2) / scale;
        let divisor = 10_u64.pow(decimals);
        let whole = group_thousands(rounded / divisor);
        let sign = if amount.is_negative() && rounded != 0 { "-" } else { "" };

        if decimals == 0 {
            format!("{}{} {}", sign, self.symbol, whole)
        } else {
            format!(
                "{}{} {}.{:0width$}",
                sign,
                self.symbol,
                whole,
                rounded % divisor,
                width = decimals as usize
            )
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_units_rounds_to_cents() {
        assert_eq!(Money::from_units(150.0).unwrap().cents(), 15_000);
        assert_eq!(Money::from_units(-12.5).unwrap().cents(), -1_250);
        assert_eq!(Money::from_units(0.005).unwrap().cents(), 1);
        assert_eq!(Money::from_units(0.1 + 0.2).unwrap().cents(), 30);
        assert!(Money::from_units(f64::INFINITY).is_none());
        assert!(Money::from_units(1e300).is_none());
        assert!(Money::from_units(-92_233_720_368_547_758.08).is_none());
        assert_eq!(Money::from_units(MAX_UNITS).unwrap().cents(), 1_000_000_000_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, -b].iter().sum();
        assert_eq!(total, a);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(min - Money::from_cents(1), min);
        assert_eq!(-min, max);
        assert_eq!(max * 2, max);
        assert_eq!(min * 2, min);

        let total: Money = [max, max, max].into_iter().sum();
        assert_eq!(total, max);

        let mut acc = min;
        acc -= Money::from_cents(5);
        assert_eq!(acc, min);
    }

    #[test]
    fn test_serializes_as_units() {
        let whole = serde_json::to_string(&Money::from_cents(15_000)).unwrap();
        assert_eq!(whole, "150");

        let fractional = serde_json::to_string(&Money::from_cents(1_250)).unwrap();
        assert_eq!(fractional, "12.5");

        let back: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(back.cents(), 1_250);
        let back: Money = serde_json::from_str("-30").unwrap();
        assert_eq!(back.cents(), -3_000);
    }

    #[test]
    fn test_currency_format() {
        let fmt = CurrencyFormat::default();
        assert_eq!(fmt.format(Money::zero()), "Ksh 0.00");
        assert_eq!(fmt.format(Money::from_cents(5)), "Ksh 0.05");
        assert_eq!(fmt.format(Money::from_cents(123_456_789)), "Ksh 1,234,567.89");
        assert_eq!(fmt.format(Money::from_cents(-5_000)), "-Ksh 50.00");
    }

    #[test]
    fn test_currency_format_extremes() {
        let fmt = CurrencyFormat::default();
        assert_eq!(
            fmt.format(Money::from_cents(i64::MIN)),
            "-Ksh 92,233,720,368,547,758.08"
        );
        assert_eq!(
            fmt.format(Money::from_cents(i64::MAX)),
            "Ksh 92,233,720,368,547,758.07"
        );
        assert_eq!(
            CurrencyFormat::new("Ksh", 0).format(Money::from_cents(i64::MIN)),
            "-Ksh 92,233,720,368,547,758"
        );
    }

    #[test]
    fn test_currency_format_without_decimals() {
        let fmt = CurrencyFormat::new("KES", 0);
        assert_eq!(fmt.format(Money::from_cents(123_450)), "KES 1,235");
        assert_eq!(fmt.format(Money::from_cents(-40)), "KES 0");
    }
}
