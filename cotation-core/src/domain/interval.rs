//! Candle intervals and the named look-back horizons built on them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("unknown candle interval '{0}' (expected 5m, 1h, 4h, 1d or 1w)")]
    UnknownInterval(String),

    #[error("unknown horizon '{0}' (expected 1d, 1w, 1m, 1y or 5y)")]
    UnknownHorizon(String),
}

/// Candle width, using the exchange's interval codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Interval::FiveMinutes => Duration::minutes(5),
            Interval::OneHour => Duration::hours(1),
            Interval::FourHours => Duration::hours(4),
            Interval::OneDay => Duration::days(1),
            Interval::OneWeek => Duration::weeks(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Interval::FiveMinutes),
            "1h" => Ok(Interval::OneHour),
            "4h" => Ok(Interval::FourHours),
            "1d" => Ok(Interval::OneDay),
            "1w" => Ok(Interval::OneWeek),
            other => Err(IntervalError::UnknownInterval(other.to_string())),
        }
    }
}

/// Named look-back window: how far back to fetch and at which candle width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
    #[default]
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Horizon {
    pub const ALL: [Horizon; 5] = [
        Horizon::Day,
        Horizon::Week,
        Horizon::Month,
        Horizon::Year,
        Horizon::FiveYears,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Horizon::Day => "1d",
            Horizon::Week => "1w",
            Horizon::Month => "1m",
            Horizon::Year => "1y",
            Horizon::FiveYears => "5y",
        }
    }

    /// Short label used in report subjects ("7d", "30d", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Day => "1d",
            Horizon::Week => "7d",
            Horizon::Month => "30d",
            Horizon::Year => "1y",
            Horizon::FiveYears => "5y",
        }
    }

    pub fn interval(&self) -> Interval {
        match self {
            Horizon::Day => Interval::FiveMinutes,
            Horizon::Week => Interval::OneHour,
            Horizon::Month => Interval::FourHours,
            Horizon::Year => Interval::OneDay,
            Horizon::FiveYears => Interval::OneWeek,
        }
    }

    pub fn lookback(&self) -> Duration {
        match self {
            Horizon::Day => Duration::days(1),
            Horizon::Week => Duration::weeks(1),
            Horizon::Month => Duration::days(30),
            Horizon::Year => Duration::days(365),
            Horizon::FiveYears => Duration::days(365 * 5),
        }
    }

    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lookback()
    }

    /// Parse a horizon code, falling back to [`Horizon::Month`] for unknown codes.
    pub fn parse_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Horizon {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Horizon::ALL
            .iter()
            .copied()
            .find(|h| h.code() == s)
            .ok_or_else(|| IntervalError::UnknownHorizon(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn interval_codes_roundtrip() {
        for code in ["5m", "1h", "4h", "1d", "1w"] {
            let interval: Interval = code.parse().unwrap();
            assert_eq!(interval.as_str(), code);
        }
        assert!("3h".parse::<Interval>().is_err());
    }

    #[test]
    fn horizon_maps_to_interval_and_lookback() {
        assert_eq!(Horizon::Day.interval(), Interval::FiveMinutes);
        assert_eq!(Horizon::Week.interval(), Interval::OneHour);
        assert_eq!(Horizon::Month.interval(), Interval::FourHours);
        assert_eq!(Horizon::Year.interval(), Interval::OneDay);
        assert_eq!(Horizon::FiveYears.interval(), Interval::OneWeek);

        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            Horizon::Month.start_from(now),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn unknown_horizon_falls_back_to_month() {
        assert_eq!(Horizon::parse_or_default("2w"), Horizon::Month);
        assert_eq!(Horizon::parse_or_default("1y"), Horizon::Year);
    }

    #[test]
    fn horizon_serde_uses_codes() {
        let json = serde_json::to_string(&Horizon::Week).unwrap();
        assert_eq!(json, "\"1w\"");
    }
}
