use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EngineError, ResultEngine};

const MINOR_PER_MAJOR: i64 = 100;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (budgets, bucket
/// totals, expense amounts) to avoid floating-point drift accumulating across
/// many small additions.
///
/// Arithmetic goes through the `checked_*` methods only, so an overflow
/// always surfaces as `None` instead of wrapping.
///
/// On disk the amount is a plain JSON number in major units (`55.5`), which
/// keeps existing documents readable.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Checked multiplication by a count of intervals.
    #[must_use]
    pub fn checked_times(self, count: i64) -> Option<Money> {
        self.0.checked_mul(count).map(Money)
    }

    /// Value in major units, for JSON output and HTTP queries.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Converts a rate-service result, **truncating** anything past the
    /// second decimal (`55.009` becomes `55.00`, `-1.239` becomes `-1.23`).
    ///
    /// The float is read through its shortest decimal representation so that
    /// values like `0.29` are not truncated to `0.28`.
    pub fn from_major_truncated(value: f64) -> ResultEngine<Money> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "non finite amount: {value}"
            )));
        }
        parse_decimal(&value.to_string(), Fraction::Truncate)
    }

    /// Converts a stored major-unit number, rounding to the nearest cent.
    pub fn from_major_rounded(value: f64) -> ResultEngine<Money> {
        let minor = (value * MINOR_PER_MAJOR as f64).round();
        if !minor.is_finite() || minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return Err(EngineError::InvalidAmount(format!(
                "amount out of range: {value}"
            )));
        }
        Ok(Money(minor as i64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let minor = abs % MINOR_PER_MAJOR as u64;
        write!(f, "{sign}{major}.{minor:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, Fraction::Strict)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_major_rounded(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fraction {
    Strict,
    Truncate,
}

fn parse_decimal(s: &str, fraction: Fraction) -> ResultEngine<Money> {
    let empty = || EngineError::InvalidAmount("empty amount".to_string());
    let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(empty());
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let major_str = parts.next().ok_or_else(invalid)?;
    let minor_str = parts.next();

    if parts.next().is_some() {
        return Err(invalid());
    }

    if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let major: i64 = major_str.parse().map_err(|_| overflow())?;

    let minor: i64 = match minor_str {
        None | Some("") => 0,
        Some(frac) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            if frac.len() > 2 && fraction == Fraction::Strict {
                return Err(EngineError::InvalidAmount("too many decimals".to_string()));
            }
            let kept = &frac[..frac.len().min(2)];
            let value: i64 = kept.parse().map_err(|_| invalid())?;
            if kept.len() == 1 { value * 10 } else { value }
        }
    };

    let total = major
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|v| v.checked_add(minor))
        .ok_or_else(overflow)?;

    let signed = if negative {
        total.checked_neg().ok_or_else(overflow)?
    } else {
        total
    };

    Ok(Money(signed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn conversion_results_are_truncated() {
        assert_eq!(Money::from_major_truncated(55.0).unwrap().minor(), 5500);
        assert_eq!(Money::from_major_truncated(55.009).unwrap().minor(), 5500);
        assert_eq!(Money::from_major_truncated(12.999).unwrap().minor(), 1299);
        assert_eq!(Money::from_major_truncated(0.29).unwrap().minor(), 29);
        assert_eq!(Money::from_major_truncated(-1.239).unwrap().minor(), -123);
        assert!(Money::from_major_truncated(f64::NAN).is_err());
    }

    #[test]
    fn stored_numbers_are_rounded_to_the_cent() {
        let total: Money = serde_json::from_str("15.299999999999999").unwrap();
        assert_eq!(total.minor(), 1530);

        let total: Money = serde_json::from_str("10").unwrap();
        assert_eq!(total.minor(), 1000);
    }

    #[test]
    fn serializes_as_major_units() {
        assert_eq!(serde_json::to_string(&Money::new(5550)).unwrap(), "55.5");
    }
}
