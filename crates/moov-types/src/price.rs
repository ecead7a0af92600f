use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A ticket price in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("price is empty")]
    Empty,
    #[error("price must not be negative")]
    Negative,
    #[error("price has more than two decimal places")]
    TooPrecise,
    #[error("price is not a number: {0}")]
    Invalid(String),
    #[error("price is too large")]
    Overflow,
}

impl Price {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Price of `quantity` tickets, `None` on overflow.
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Self)
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    /// Accepts `12`, `12.5`, `12.50` and an optional leading `$`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return Err(PriceParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(PriceParseError::Negative);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((_, "")) => return Err(PriceParseError::Invalid(s.to_string())),
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if frac.len() > 2 {
            return Err(PriceParseError::TooPrecise);
        }
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) && !(whole.is_empty() && digits(frac)) {
            return Err(PriceParseError::Invalid(s.to_string()));
        }
        if !frac.is_empty() && !digits(frac) {
            return Err(PriceParseError::Invalid(s.to_string()));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| PriceParseError::Overflow)?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| PriceParseError::Invalid(s.to_string()))? * 10,
            _ => frac.parse().map_err(|_| PriceParseError::Invalid(s.to_string()))?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Self)
            .ok_or(PriceParseError::Overflow)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}
