//! Reporting periods and their numeric index
//!
//! A period label such as `"Q3 2024"` is normalized into a [`Period`], which orders
//! chronologically and maps onto a real-valued index (`year + (quarter - 1) * 0.25`)
//! that the trend detector uses as its regression axis.

use crate::error::{AnomalyError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fiscal quarter designator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Offset of the quarter within its year on the period index axis
    pub fn fraction(self) -> f64 {
        match self {
            Self::Q1 => 0.0,
            Self::Q2 => 0.25,
            Self::Q3 => 0.5,
            Self::Q4 => 0.75,
        }
    }

    /// Quarter number, 1 through 4
    pub fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        match token {
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "Q4" => Some(Self::Q4),
            _ => None,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// A quarterly reporting period
///
/// Field order makes the derived `Ord` chronological: year first, then quarter.
///
/// # Example
///
/// ```
/// use agent_anomaly::Period;
///
/// let period: Period = "Q3 2024".parse().unwrap();
/// assert_eq!(period.index(), 2024.5);
/// assert_eq!(period.to_string(), "Q3 2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub quarter: Quarter,
}

impl Period {
    pub fn new(year: i32, quarter: Quarter) -> Self {
        Self { year, quarter }
    }

    /// Numeric period index used for ordering and regression
    pub fn index(&self) -> f64 {
        f64::from(self.year) + self.quarter.fraction()
    }

    /// Parse a `"Q<1-4> <year>"` label
    pub fn parse(label: &str) -> Result<Self> {
        let malformed = |reason: &str| AnomalyError::MalformedPeriod {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let tokens: Vec<&str> = label.split_whitespace().collect();
        let [quarter_token, year_token] = tokens.as_slice() else {
            return Err(malformed("expected exactly two tokens, e.g. 'Q3 2024'"));
        };

        let quarter = Quarter::parse_token(quarter_token)
            .ok_or_else(|| malformed("quarter must be one of Q1, Q2, Q3, Q4"))?;
        let year = year_token
            .parse::<i32>()
            .map_err(|_| malformed("year must be an integer"))?;

        Ok(Self { year, quarter })
    }
}

impl FromStr for Period {
    type Err = AnomalyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quarter, self.year)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::parse(&label).map_err(serde::de::Error::custom)
    }
}
