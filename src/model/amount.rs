//! Amount type for handling monetary values that arrive as JSON numbers or formatted strings.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Backends are inconsistent about
//! amounts: some send `1250`, some `"1250.00"`, and some `"₹1,250.00"`-style strings with a
//! currency sign and thousands separators. All of these parse to the same value.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency signs that are stripped when parsing.
const CURRENCY_SIGNS: &[char] = &['$', '₹', '€', '£'];

/// Represents how an amount was (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ sign: Some('$'), commas: true }` -> `-$60,000.00`
///  - `AmountFormat{ sign: None, commas: true }` -> `-60,000.00`
///  - `AmountFormat{ sign: None, commas: false }` -> `-60000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AmountFormat {
    /// The currency sign present in the formatting, if any.
    sign: Option<char>,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

/// Represents a monetary amount.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
///
/// # Examples
///
/// ```
/// # use paylens::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("1250").unwrap();
/// let b = Amount::from_str("$1,250.00").unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.value(), b.value());
/// assert_eq!(b.to_string(), "$1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with plain formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: AmountFormat {
                sign: None,
                commas: false,
            },
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Split off a leading minus so that "-$50" and "$-50" both work
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let sign = rest.chars().next().filter(|c| CURRENCY_SIGNS.contains(c));
        let rest = match sign {
            Some(c) => &rest[c.len_utf8()..],
            None => rest,
        };

        let without_commas = rest.replace(',', "");
        let commas = without_commas.len() < rest.len();

        let mut value = Decimal::from_str(without_commas.trim()).map_err(AmountError)?;
        if negative {
            value = -value;
        }
        Ok(Amount {
            value,
            format: AmountFormat { sign, commas },
        })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (minus, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };

        let sign = self.format.sign.map(String::from).unwrap_or_default();

        if self.format.commas {
            write!(
                f,
                "{minus}{sign}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{minus}{sign}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Decimal::try_from(v)
            .map(|d| Amount::new(d.normalize()))
            .map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_with_currency_sign_and_commas() {
        let amount = Amount::from_str("₹1,250.50").unwrap();
        assert_eq!(amount.value(), dec("1250.50"));
        assert_eq!(amount.to_string(), "₹1,250.50");
    }

    #[test]
    fn test_parse_negative_with_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50.00"));
        assert_eq!(amount.to_string(), "-$50.00");
    }

    #[test]
    fn test_parse_empty_string_is_zero() {
        let amount = Amount::from_str("   ").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("twelve").is_err());
    }

    #[test]
    fn test_deserialize_integer() {
        let amount: Amount = serde_json::from_str("200").unwrap();
        assert_eq!(amount.value(), Decimal::from(200));
        assert_eq!(amount.to_string(), "200");
    }

    #[test]
    fn test_deserialize_float() {
        let amount: Amount = serde_json::from_str("99.5").unwrap();
        assert_eq!(amount.value(), dec("99.5"));
    }

    #[test]
    fn test_deserialize_string() {
        let amount: Amount = serde_json::from_str("\"$1,000.00\"").unwrap();
        assert_eq!(amount.value(), dec("1000"));
    }

    #[test]
    fn test_deserialize_bool_fails() {
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn test_zero_is_not_negative() {
        let zero = Amount::from_str("-0").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }
}
