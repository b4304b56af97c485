//! Calendar dates in `DD/MM/YYYY` form
//!
//! `TripDate` is a plain day/month/year triple. No calendar validation is
//! performed, so `31/02/2025` is accepted as-is; ordering is by
//! (year, month, day).

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A day/month/year date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl TripDate {
    /// Create a date from its parts
    pub const fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// Today's local date
    pub fn today() -> Self {
        Local::now().date_naive().into()
    }

    /// Parse a `DD/MM/YYYY` string
    ///
    /// The input is split on `/` and each part is parsed as an integer
    /// after trimming whitespace.
    pub fn parse(s: &str) -> Result<Self, DateParseError> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(DateParseError::InvalidFormat(s.to_string()));
        }

        let day = parts[0]
            .trim()
            .parse::<u32>()
            .map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
        let month = parts[1]
            .trim()
            .parse::<u32>()
            .map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
        let year = parts[2]
            .trim()
            .parse::<i32>()
            .map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;

        Ok(Self { day, month, year })
    }

    /// Convert to a chrono date, if the triple is a real calendar date
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl Default for TripDate {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl Ord for TripDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month.cmp(&other.month))
            .then(self.day.cmp(&other.day))
    }
}

impl PartialOrd for TripDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TripDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:02}", self.day, self.month, self.year)
    }
}

impl FromStr for TripDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for TripDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.day(), date.month(), date.year())
    }
}

impl Serialize for TripDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TripDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error type for date parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    InvalidFormat(String),
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid date (expected DD/MM/YYYY): {}", s),
        }
    }
}

impl std::error::Error for DateParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(TripDate::new(1, 6, 2025).to_string(), "01/06/2025");
        assert_eq!(TripDate::new(15, 12, 1990).to_string(), "15/12/1990");
        assert_eq!(TripDate::default().to_string(), "01/01/01");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            TripDate::parse("15/03/1995").unwrap(),
            TripDate::new(15, 3, 1995)
        );
        assert_eq!(
            TripDate::parse(" 1/6/2025 ").unwrap(),
            TripDate::new(1, 6, 2025)
        );
        assert!(TripDate::parse("2025-06-01").is_err());
        assert!(TripDate::parse("aa/bb/cccc").is_err());
        assert!(TripDate::parse("1/2").is_err());
    }

    #[test]
    fn test_no_calendar_validation() {
        let date = TripDate::parse("31/02/2025").unwrap();
        assert_eq!(date.day, 31);
        assert!(date.to_naive().is_none());
    }

    #[test]
    fn test_ordering() {
        let a = TripDate::new(31, 12, 2024);
        let b = TripDate::new(1, 1, 2025);
        let c = TripDate::new(2, 1, 2025);

        assert!(a < b);
        assert!(b < c);
        assert_eq!(b.max(c), c);
    }

    #[test]
    fn test_from_naive() {
        let naive = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(TripDate::from(naive), TripDate::new(1, 6, 2025));
    }

    #[test]
    fn test_serde_as_string() {
        let date = TripDate::new(2, 2, 1992);
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"02/02/1992\"");

        let back: TripDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
