//! # Money Module
//!
//! Provides the `Money` type for catalog prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog API speaks decimal numbers:                                │
//! │    { "preco": 12.9, "precoDesconto": 9.99 }                             │
//! │                                                                         │
//! │  Summing those as f64 drifts:                                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: parse once at the boundary into integer centavos         │
//! │    12.9 ──► Money(1290)   9.99 ──► Money(999)                           │
//! │    aggregates (catalog value, averages) are exact integer sums          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! `Money` serializes as a decimal number of reais (`12.9`) and deserializes
//! from either a JSON number or a numeric string (`"12,90"`, `"12.90"`),
//! rounding to the nearest centavo.
//!
//! ## Usage
//! ```rust
//! use backoffice_core::money::Money;
//!
//! let price = Money::from_cents(1099); // R$ 10,99
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.to_string(), "R$ 15,99");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between prices can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Custom serde**: the API exchanges decimal reais, not centavos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -R$ 5,50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount of reais, rounding to the nearest centavo.
    ///
    /// This is the single place floats enter the system: the API hands us
    /// decimals and they are fixed to integers here.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.9).cents(), 1290);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Parses operator input such as `"12,90"`, `"12.90"` or `"R$ 1.234,56"`.
    ///
    /// ## Rules
    /// - A comma is the decimal separator when present (pt-BR input)
    /// - Dots before a comma are thousands separators
    /// - Without a comma, a dot is the decimal separator
    pub fn parse_decimal(input: &str) -> CoreResult<Self> {
        let cleaned: String = input
            .trim()
            .trim_start_matches("R$")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return Err(CoreError::InvalidAmount("empty amount".to_string()));
        }

        let normalized = if cleaned.contains(',') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned
        };

        let value: f64 = normalized
            .parse()
            .map_err(|_| CoreError::InvalidAmount(input.to_string()))?;

        if !value.is_finite() {
            return Err(CoreError::InvalidAmount(input.to_string()));
        }

        Ok(Money::from_decimal(value))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as decimal reais (for the wire only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Percentage saved when `self` is the discounted price of `original`.
    ///
    /// Rounded to the nearest whole percent. Returns 0 when `original` is not
    /// positive or the discount is not below it.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let price = Money::from_cents(5000);
    /// let discount = Money::from_cents(4000);
    /// assert_eq!(discount.discount_percentage_of(price), 20);
    /// ```
    pub fn discount_percentage_of(&self, original: Money) -> u32 {
        if !original.is_positive() || *self >= original || self.is_negative() {
            return 0;
        }
        let saved = (original.0 - self.0) as i128;
        ((saved * 100 + original.0 as i128 / 2) / original.0 as i128) as u32
    }

    /// Formats as Brazilian currency: `R$ 1.234,56`.
    pub fn format_brl(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let reais = self.reais().abs().to_string();

        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, ch) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

// =============================================================================
// Serde (decimal reais on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }

        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Ok(Money::from_decimal(n)),
            RawAmount::Text(s) => Money::parse_decimal(&s).map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the pt-BR currency format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_brl())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Wire values can sit at the i64 limits, so arithmetic saturates.

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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
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
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_centavo() {
        assert_eq!(Money::from_decimal(50.0).cents(), 5000);
        assert_eq!(Money::from_decimal(12.9).cents(), 1290);
        assert_eq!(Money::from_decimal(9.999).cents(), 1000);
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    }

    #[test]
    fn test_parse_decimal_inputs() {
        assert_eq!(Money::parse_decimal("12,90").unwrap().cents(), 1290);
        assert_eq!(Money::parse_decimal("12.90").unwrap().cents(), 1290);
        assert_eq!(Money::parse_decimal("R$ 1.234,56").unwrap().cents(), 123456);
        assert_eq!(Money::parse_decimal(" 40 ").unwrap().cents(), 4000);
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("abc").is_err());
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(123456789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
    }

    #[test]
    fn test_serde_uses_decimal_reais() {
        let json = serde_json::to_string(&Money::from_cents(1290)).unwrap();
        assert_eq!(json, "12.9");

        let from_number: Money = serde_json::from_str("50").unwrap();
        assert_eq!(from_number.cents(), 5000);

        let from_text: Money = serde_json::from_str("\"39,90\"").unwrap();
        assert_eq!(from_text.cents(), 3990);
    }

    #[test]
    fn test_discount_percentage() {
        let price = Money::from_cents(5000);
        assert_eq!(Money::from_cents(4000).discount_percentage_of(price), 20);
        assert_eq!(Money::from_cents(3333).discount_percentage_of(price), 33);
        assert_eq!(Money::from_cents(5000).discount_percentage_of(price), 0);
        assert_eq!(Money::from_cents(100).discount_percentage_of(Money::zero()), 0);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);

        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + a).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - a).cents(), i64::MIN);
        assert_eq!((max * 2).cents(), i64::MAX);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
