//! String formats understood by the casting engine
//!
//! `date`, `date-time` and `duration` are parsed into temporal values; every
//! other format name is carried through to documents untouched.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Format attached to a string (or numeric) schema node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Date,
    DateTime,
    Duration,
    /// Any other format name, e.g. `email`, `uuid`, `int64`
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Duration => "duration",
            Format::Other(name) => name,
        }
    }

    /// Whether casting parses values of this format into a temporal type
    pub fn is_temporal(&self) -> bool {
        !matches!(self, Format::Other(_))
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        match name {
            "date" => Format::Date,
            "date-time" | "datetime" => Format::DateTime,
            "duration" => Format::Duration,
            other => Format::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Format {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Format::from(name.as_str()))
    }
}

/// Parse a calendar date (`YYYY-MM-DD`)
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp
pub fn parse_date_time(input: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(input.trim()).ok()
}

/// An ISO 8601 duration such as `P1Y2M10DT2H30M` or `P3W`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

fn duration_regex() -> &'static Regex {
    static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
    DURATION_REGEX.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:[.,]\d+)?)S)?)?$",
        )
        .expect("duration pattern is valid")
    })
}

impl IsoDuration {
    /// Approximate length in seconds, counting a year as 365 days and a month as 30
    pub fn as_seconds(&self) -> f64 {
        let days = self.years as f64 * 365.0
            + self.months as f64 * 30.0
            + self.weeks as f64 * 7.0
            + self.days as f64;
        days * 86_400.0 + self.hours as f64 * 3_600.0 + self.minutes as f64 * 60.0 + self.seconds
    }
}

impl FromStr for IsoDuration {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let captures = duration_regex()
            .captures(input)
            .ok_or_else(|| format!("'{}' is not an ISO 8601 duration", input))?;

        // "P" and "PT" alone carry no components
        if captures.iter().skip(1).all(|group| group.is_none()) {
            return Err(format!("'{}' has no duration components", input));
        }
        // a `T` must be followed by at least one time component
        if input.contains('T') && (5..=7).all(|index| captures.get(index).is_none()) {
            return Err(format!("'{}' has a time designator without time components", input));
        }

        let whole = |index: usize| -> Result<u32, String> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u32>().map_err(|e| e.to_string()))
                .unwrap_or(Ok(0))
        };
        let seconds = captures
            .get(7)
            .map(|m| m.as_str().replace(',', ".").parse::<f64>().map_err(|e| e.to_string()))
            .unwrap_or(Ok(0.0))?;

        Ok(Self {
            years: whole(1)?,
            months: whole(2)?,
            weeks: whole(3)?,
            days: whole(4)?,
            hours: whole(5)?,
            minutes: whole(6)?,
            seconds,
        })
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        if self.years > 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.weeks > 0 {
            write!(f, "{}W", self.weeks)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0.0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0.0 {
                write!(f, "{}S", self.seconds)?;
            }
        } else if self.years == 0 && self.months == 0 && self.weeks == 0 && self.days == 0 {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(Format::from("date-time"), Format::DateTime);
        assert_eq!(Format::from("email"), Format::Other("email".to_string()));
        assert!(Format::Duration.is_temporal());
        assert!(!Format::from("uuid").is_temporal());
        assert_eq!(Format::DateTime.to_string(), "date-time");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_date_time() {
        let parsed = parse_date_time("2024-05-01T12:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T12:30:00+02:00");
        assert!(parse_date_time("2024-05-01").is_none());
    }

    #[test]
    fn test_parse_duration() {
        let duration: IsoDuration = "P1Y2M10DT2H30M".parse().unwrap();
        assert_eq!(duration.years, 1);
        assert_eq!(duration.months, 2);
        assert_eq!(duration.days, 10);
        assert_eq!(duration.hours, 2);
        assert_eq!(duration.minutes, 30);
        assert_eq!(duration.to_string(), "P1Y2M10DT2H30M");

        let weeks: IsoDuration = "P3W".parse().unwrap();
        assert_eq!(weeks.as_seconds(), 21.0 * 86_400.0);

        let fractional: IsoDuration = "PT1,5S".parse().unwrap();
        assert_eq!(fractional.seconds, 1.5);
    }

    #[test]
    fn test_reject_malformed_duration() {
        assert!("P".parse::<IsoDuration>().is_err());
        assert!("PT".parse::<IsoDuration>().is_err());
        assert!("1Y".parse::<IsoDuration>().is_err());
        assert!("P1H".parse::<IsoDuration>().is_err());
        assert!("P1YT".parse::<IsoDuration>().is_err());
        assert!("P1YT2H".parse::<IsoDuration>().is_ok());
    }
}
