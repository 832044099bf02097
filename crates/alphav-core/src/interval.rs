//! Intraday interval and listing asset type definitions.
//!
//! This module defines [`Interval`] for the spacing of intraday bars and
//! [`AssetType`] for the kinds of tradeables returned by the listing endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Spacing between elements of an intraday series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// One-minute bars.
    #[serde(rename = "1min")]
    OneMinute,
    /// Five-minute bars.
    #[default]
    #[serde(rename = "5min")]
    FiveMinute,
    /// Fifteen-minute bars.
    #[serde(rename = "15min")]
    FifteenMinute,
    /// Thirty-minute bars.
    #[serde(rename = "30min")]
    ThirtyMinute,
    /// Hourly bars.
    #[serde(rename = "60min")]
    SixtyMinute,
}

impl Interval {
    /// Every supported interval, shortest first.
    pub const ALL: &'static [Self] = &[
        Self::OneMinute,
        Self::FiveMinute,
        Self::FifteenMinute,
        Self::ThirtyMinute,
        Self::SixtyMinute,
    ];

    /// Returns the interval as used in API query strings and JSON keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinute => "5min",
            Self::FifteenMinute => "15min",
            Self::ThirtyMinute => "30min",
            Self::SixtyMinute => "60min",
        }
    }

    /// Returns the interval length in minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        match self {
            Self::OneMinute => 1,
            Self::FiveMinute => 5,
            Self::FifteenMinute => 15,
            Self::ThirtyMinute => 30,
            Self::SixtyMinute => 60,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| DataError::InvalidInterval(s.to_string()))
    }
}

/// Kind of tradeable returned by the listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Common stock.
    Stock,
    /// Exchange traded fund.
    #[serde(rename = "ETF")]
    Etf,
}

impl AssetType {
    /// Returns the asset type as written in the listing CSV.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "Stock",
            Self::Etf => "ETF",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Stock" => Ok(Self::Stock),
            "ETF" => Ok(Self::Etf),
            other => Err(DataError::InvalidParameter(format!(
                "unable to parse asset type from: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_round_trip() {
        for interval in Interval::ALL {
            let parsed: Interval = interval.to_string().parse().unwrap();
            assert_eq!(parsed, *interval);
        }
    }

    #[test]
    fn test_interval_rejects_unknown() {
        for s in ["", "2min", "1h", "5MIN"] {
            assert!(matches!(
                s.parse::<Interval>(),
                Err(DataError::InvalidInterval(_))
            ));
        }
    }

    #[test]
    fn test_interval_defaults() {
        assert_eq!(Interval::default(), Interval::FiveMinute);
        assert_eq!(Interval::SixtyMinute.minutes(), 60);
    }

    #[test]
    fn test_asset_type_parse() {
        assert_eq!("Stock".parse::<AssetType>().unwrap(), AssetType::Stock);
        assert_eq!("ETF".parse::<AssetType>().unwrap(), AssetType::Etf);
        assert!("Bond".parse::<AssetType>().is_err());
        assert_eq!(AssetType::Etf.to_string(), "ETF");
    }
}
