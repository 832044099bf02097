//! Information types selectable from each data domain.
//!
//! Every endpoint returns a small closed set of numeric fields per element.
//! Each domain has its own enumeration and the enumerations are not
//! interchangeable:
//!
//! - [`DailyInformation`] - daily adjusted equity series
//! - [`IntradayInformation`] - intraday equity series
//! - [`FxInformation`] - daily FX series
//! - [`RateInformation`] - realtime FX exchange rate quote
//!
//! Only valid variants are representable; converting from a string goes
//! through [`FromStr`] and fails with [`DataError::InvalidInformationType`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::DataError;

/// Common behaviour of the per-domain information enumerations.
pub trait InformationTag:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = DataError>
    + Send
    + Sync
    + 'static
{
    /// Every variant of the domain, in API field order.
    const ALL: &'static [Self];

    /// Short name of the domain, used in error messages.
    const DOMAIN: &'static str;

    /// Human readable name (e.g. `"adjusted close"`).
    fn name(&self) -> &'static str;

    /// Field key used by the API in the JSON body (e.g. `"5. adjusted close"`).
    fn api_field(&self) -> &'static str;

    /// Returns true if the value belongs to the domain's enumeration.
    fn is_valid(&self) -> bool {
        Self::ALL.contains(self)
    }
}

/// Looks up a variant by human name or API field key, ignoring ASCII case.
fn lookup<T: InformationTag>(s: &str) -> Result<T, DataError> {
    let s = s.trim();
    T::ALL
        .iter()
        .copied()
        .find(|t| t.name().eq_ignore_ascii_case(s) || t.api_field().eq_ignore_ascii_case(s))
        .ok_or_else(|| DataError::InvalidInformationType(format!("{}: {s}", T::DOMAIN)))
}

/// Fields of the daily adjusted equity series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyInformation {
    /// Opening price.
    Open,
    /// Highest price of the day.
    High,
    /// Lowest price of the day.
    Low,
    /// Closing price.
    Close,
    /// Split/dividend adjusted closing price.
    AdjustedClose,
    /// Traded volume.
    Volume,
    /// Dividend paid on the day.
    DividendAmount,
    /// Split coefficient applied on the day.
    SplitCoefficient,
}

impl InformationTag for DailyInformation {
    const ALL: &'static [Self] = &[
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::AdjustedClose,
        Self::Volume,
        Self::DividendAmount,
        Self::SplitCoefficient,
    ];
    const DOMAIN: &'static str = "daily";

    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::AdjustedClose => "adjusted close",
            Self::Volume => "volume",
            Self::DividendAmount => "dividend amount",
            Self::SplitCoefficient => "split coefficient",
        }
    }

    fn api_field(&self) -> &'static str {
        match self {
            Self::Open => "1. open",
            Self::High => "2. high",
            Self::Low => "3. low",
            Self::Close => "4. close",
            Self::AdjustedClose => "5. adjusted close",
            Self::Volume => "6. volume",
            Self::DividendAmount => "7. dividend amount",
            Self::SplitCoefficient => "8. split coefficient",
        }
    }
}

impl fmt::Display for DailyInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DailyInformation {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// Fields of the intraday equity series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntradayInformation {
    /// Opening price of the bar.
    Open,
    /// Highest price of the bar.
    High,
    /// Lowest price of the bar.
    Low,
    /// Closing price of the bar.
    Close,
    /// Traded volume of the bar.
    Volume,
}

impl InformationTag for IntradayInformation {
    const ALL: &'static [Self] = &[Self::Open, Self::High, Self::Low, Self::Close, Self::Volume];
    const DOMAIN: &'static str = "intraday";

    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    fn api_field(&self) -> &'static str {
        match self {
            Self::Open => "1. open",
            Self::High => "2. high",
            Self::Low => "3. low",
            Self::Close => "4. close",
            Self::Volume => "5. volume",
        }
    }
}

impl fmt::Display for IntradayInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntradayInformation {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// Fields of the daily FX series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxInformation {
    /// Opening rate.
    Open,
    /// Highest rate of the day.
    High,
    /// Lowest rate of the day.
    Low,
    /// Closing rate.
    Close,
}

impl InformationTag for FxInformation {
    const ALL: &'static [Self] = &[Self::Open, Self::High, Self::Low, Self::Close];
    const DOMAIN: &'static str = "fx";

    fn name(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }

    fn api_field(&self) -> &'static str {
        match self {
            Self::Open => "1. open",
            Self::High => "2. high",
            Self::Low => "3. low",
            Self::Close => "4. close",
        }
    }
}

impl fmt::Display for FxInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FxInformation {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

/// Fields of a realtime FX exchange rate quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateInformation {
    /// Mid exchange rate.
    Rate,
    /// Bid price.
    Bid,
    /// Ask price.
    Ask,
}

impl InformationTag for RateInformation {
    const ALL: &'static [Self] = &[Self::Rate, Self::Bid, Self::Ask];
    const DOMAIN: &'static str = "fx rate";

    fn name(&self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }

    fn api_field(&self) -> &'static str {
        match self {
            Self::Rate => "5. Exchange Rate",
            Self::Bid => "8. Bid Price",
            Self::Ask => "9. Ask Price",
        }
    }
}

impl fmt::Display for RateInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RateInformation {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_names_round_trip() {
        for tag in DailyInformation::ALL {
            assert!(tag.is_valid());
            assert_eq!(tag.to_string().parse::<DailyInformation>().unwrap(), *tag);
            assert_eq!(tag.api_field().parse::<DailyInformation>().unwrap(), *tag);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Adjusted Close".parse::<DailyInformation>().unwrap(),
            DailyInformation::AdjustedClose
        );
        assert_eq!("BID".parse::<RateInformation>().unwrap(), RateInformation::Bid);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for name in ["", "unknown", "adjusted", "99"] {
            let err = name.parse::<DailyInformation>().unwrap_err();
            assert!(matches!(err, DataError::InvalidInformationType(_)));
        }
    }

    #[test]
    fn test_domains_are_not_interchangeable() {
        assert!("adjusted close".parse::<IntradayInformation>().is_err());
        assert!("volume".parse::<FxInformation>().is_err());
        assert!("open".parse::<RateInformation>().is_err());
        assert!("volume".parse::<IntradayInformation>().is_ok());
    }

    #[test]
    fn test_api_fields() {
        assert_eq!(DailyInformation::Volume.api_field(), "6. volume");
        assert_eq!(IntradayInformation::Volume.api_field(), "5. volume");
        assert_eq!(RateInformation::Rate.api_field(), "5. Exchange Rate");
        assert_eq!(FxInformation::ALL.len(), 4);
    }
}
