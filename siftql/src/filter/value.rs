//! Typed literal values
//!
//! Comparison arguments arrive as raw text and are cast into [`Value`] once the
//! comparison has been validated. Adapters only ever see typed values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Largest decimal exponent accepted when parsing (`1e4096`)
const MAX_DECIMAL_EXPONENT: i64 = 4096;

/// Errors that can occur while parsing a decimal literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("decimal literal is empty")]
    Empty,
    #[error("invalid decimal digits in {0:?}")]
    InvalidDigits(String),
    #[error("decimal exponent out of range in {0:?}")]
    ExponentOutOfRange(String),
}

/// Arbitrary-precision decimal number (`mantissa * 10^-scale`)
///
/// The scale written in the literal is kept, so `1.50` and `1.5` are
/// distinct values with the same magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let literal = s.trim();
        if literal.is_empty() {
            return Err(DecimalError::Empty);
        }

        let (number, exponent) = match literal.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = literal[idx + 1..]
                    .parse()
                    .map_err(|_| DecimalError::InvalidDigits(literal.to_string()))?;
                if exp.unsigned_abs() > MAX_DECIMAL_EXPONENT as u64 {
                    return Err(DecimalError::ExponentOutOfRange(literal.to_string()));
                }
                (&literal[..idx], exp)
            }
            None => (literal, 0),
        };

        let (negative, unsigned) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(DecimalError::InvalidDigits(literal.to_string()));
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| DecimalError::InvalidDigits(literal.to_string()))?;
        if negative {
            mantissa = -mantissa;
        }

        let scale = frac_part.len() as i64 - exponent;
        if scale < 0 {
            mantissa *= BigInt::from(10u32).pow(scale.unsigned_abs() as u32);
            Ok(Self::new(mantissa, 0))
        } else {
            Ok(Self::new(mantissa, scale as u32))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sign = if self.mantissa.is_negative() && !self.mantissa.is_zero() {
            "-"
        } else {
            ""
        };
        if self.scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

/// Typed comparison argument handed to a target adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (only produced by an unresolvable enumeration literal)
    Null,
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

/// Plain JSON form: decimals and timestamps serialize as strings
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Boolean(v) => serializer.serialize_bool(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Decimal(_) | Self::DateTime(_) => serializer.collect_str(self),
        }
    }
}
