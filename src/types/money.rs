use crate::types::MoneyError;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DECIMAL_PLACES: usize = 2;
const SCALE: i64 = 10i64.pow(DECIMAL_PLACES as u32);

/// A EUR amount held as integer minor units (cents).
///
/// Arithmetic is checked and never wraps; conversion to decimal text only
/// happens at the formatting boundary.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Money(major * SCALE)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Renders the amount the way the portal shows it: `1.502,50`.
    pub fn to_localized(self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let (integer, fraction) = self.split();
        let digits = integer.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        format!("{sign}{grouped},{fraction:0width$}", width = DECIMAL_PLACES)
    }

    fn split(self) -> (u64, u64) {
        let abs = self.0.unsigned_abs();
        (abs / SCALE as u64, abs % SCALE as u64)
    }
}

impl Display for Money {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let (integer, fraction) = self.split();
        write!(formatter, "{}{}.{:0width$}", sign, integer, fraction, width = DECIMAL_PLACES)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses user-typed amounts. Either `.` or `,` is accepted as the fractional separator.
    ///
    /// When both appear, the last one separates the fraction and the other groups
    /// thousands, so `1.502,50` and `1,502.50` both read as 1502.50.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(MoneyError::InvalidFormat("Value is an empty string".to_string()));
        }

        let (integer_part, fraction_part) = match value.rfind(['.', ',']) {
            Some(index) if value.contains('.') && value.contains(',') => {
                let (integer, fraction) = (&value[..index], &value[index + 1..]);
                let separator = &value[index..index + 1];

                if integer.contains(separator) {
                    return Err(MoneyError::InvalidFormat("Value has more than one decimal separator".to_string()));
                }

                (ungroup(integer, value)?, Some(fraction))
            }
            _ => match value.split_once(['.', ',']) {
                Some((integer, fraction)) => (integer.to_string(), Some(fraction)),
                None => (value.to_string(), None)
            }
        };

        let unsigned = integer_part.strip_prefix(['+', '-']).unwrap_or(&integer_part);

        if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyError::InvalidFormat(format!("Value has an invalid integer part: {value}")));
        }

        let fraction: i64 = match fraction_part {
            Some(fraction) if fraction.contains(['.', ',']) => {
                return Err(MoneyError::InvalidFormat("Value has more than one decimal separator".to_string()));
            }
            Some(fraction) if fraction.len() > DECIMAL_PLACES => {
                return Err(MoneyError::Precision(value.to_string()));
            }
            Some(fraction) if !fraction.chars().all(|c| c.is_ascii_digit()) => {
                return Err(MoneyError::InvalidFormat(format!("Value has an invalid fraction part: {value}")));
            }
            Some(fraction) if !fraction.is_empty() => {
                format!("{:0<width$}", fraction, width = DECIMAL_PLACES).parse()?
            }
            _ => 0
        };

        let integer: i64 = unsigned.parse()?;
        let magnitude = integer.checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(MoneyError::Overflow)?;

        let is_negative = integer_part.starts_with('-');

        Ok(Money(if is_negative { -magnitude } else { magnitude }))
    }
}

/// Strips thousands separators. The first group holds 1 to 3 digits, every later group exactly 3.
fn ungroup(integer: &str, value: &str) -> Result<String, MoneyError> {
    let (sign, digits) = match integer.strip_prefix(['+', '-']) {
        Some(rest) => (&integer[..1], rest),
        None => ("", integer)
    };

    let mut groups = digits.split(['.', ',']);
    let leading = groups.next().unwrap_or_default();
    let valid = (1..=3).contains(&leading.len()) && groups.all(|group| group.len() == 3);

    if !valid {
        return Err(MoneyError::InvalidFormat(format!("Value has misplaced grouping separators: {value}")));
    }

    Ok(format!("{sign}{}", digits.replace(['.', ','], "")))
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let normalized = value.normalize();

        if normalized.scale() > DECIMAL_PLACES as u32 {
            return Err(MoneyError::Precision(value.to_string()));
        }

        let minor = normalized.checked_mul(Decimal::from(SCALE))
            .ok_or(MoneyError::Overflow)?;

        i64::try_from(minor).map(Money).map_err(|_| MoneyError::Overflow)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        Decimal::new(value.0, DECIMAL_PLACES as u32)
    }
}

/// Seed data carries plain decimal strings (`2450.75`), not localized input.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(value.trim()).map_err(de::Error::custom)?;
        Money::try_from(decimal).map_err(de::Error::custom)
    }
}
