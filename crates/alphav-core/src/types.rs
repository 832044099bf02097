//! Core data types for Alpha Vantage market data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] / [`CurrencyCode`] - Identifiers, uppercased on creation
//! - [`TimeSeries`] - Ordered, most-recent-first series of [`Element`]s
//! - [`Metadata`] - What a series contains and where it came from
//! - [`DividendHistory`] - Dividend payments for a symbol
//! - [`ExchangeRate`] - Realtime FX quote
//! - [`Listing`] - Active tradeables and their reference information

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::information::{
    DailyInformation, FxInformation, InformationTag, IntradayInformation, RateInformation,
};
use crate::interval::{AssetType, Interval};
use crate::options::ListingOptions;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// An ISO currency code (e.g. `EUR`), uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a new currency code, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What a series was requested for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// An equity or ETF symbol.
    Equity(Symbol),
    /// A currency pair.
    CurrencyPair {
        /// Base currency.
        from: CurrencyCode,
        /// Quote currency.
        to: CurrencyCode,
    },
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity(symbol) => write!(f, "{symbol}"),
            Self::CurrencyPair { from, to } => write!(f, "{from}/{to}"),
        }
    }
}

/// Range of timestamps covered by a data set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRange {
    /// Earliest timestamp.
    pub start: DateTime<Utc>,
    /// Latest timestamp.
    pub end: DateTime<Utc>,
}

impl DataRange {
    /// Computes the range spanned by `timestamps`, or `None` if there are none.
    pub fn spanning<I>(timestamps: I) -> Option<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        timestamps.into_iter().fold(None, |range, t| match range {
            None => Some(Self { start: t, end: t }),
            Some(r) => Some(Self {
                start: r.start.min(t),
                end: r.end.max(t),
            }),
        })
    }
}

/// Describes what information a series holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata<T> {
    /// Information types that were requested and populated for every element.
    pub information: Vec<T>,
    /// The symbol or currency pair the data is for.
    pub instrument: Instrument,
    /// Time the data itself was last updated.
    pub last_refresh: DateTime<Utc>,
    /// Time zone the API reports timestamps in.
    pub time_zone: String,
    /// Bar interval, for intraday series.
    pub interval: Option<Interval>,
    /// Range of element timestamps.
    pub data_range: Option<DataRange>,
}

impl<T: InformationTag> Metadata<T> {
    /// Creates metadata with no interval and no data range.
    #[must_use]
    pub fn new(
        information: Vec<T>,
        instrument: Instrument,
        last_refresh: DateTime<Utc>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            information,
            instrument,
            last_refresh,
            time_zone: time_zone.into(),
            interval: None,
            data_range: None,
        }
    }

    /// Returns true if `tag` was requested for this series.
    #[must_use]
    pub fn contains(&self, tag: T) -> bool {
        self.information.contains(&tag)
    }
}

/// A single dated entry of a [`TimeSeries`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element<T: Ord> {
    /// Timestamp of the element (UTC; dates are midnight).
    pub timestamp: DateTime<Utc>,
    /// Values for the requested information types.
    pub data: BTreeMap<T, f64>,
}

impl<T: InformationTag> Element<T> {
    /// Creates an element with no values.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            data: BTreeMap::new(),
        }
    }

    /// Sets a value.
    #[must_use]
    pub fn with(mut self, tag: T, value: f64) -> Self {
        self.data.insert(tag, value);
        self
    }

    /// Returns the value for `tag`, if present.
    #[must_use]
    pub fn get(&self, tag: T) -> Option<f64> {
        self.data.get(&tag).copied()
    }
}

/// Ordered series of elements, most recent first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T: Ord> {
    /// Details of the series.
    pub meta: Metadata<T>,
    /// Elements, sorted descending by timestamp.
    pub elements: Vec<Element<T>>,
}

impl<T: InformationTag> TimeSeries<T> {
    /// Creates a series, sorting the elements most recent first and filling
    /// in the data range.
    #[must_use]
    pub fn new(mut meta: Metadata<T>, mut elements: Vec<Element<T>>) -> Self {
        elements.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        meta.data_range = DataRange::spanning(elements.iter().map(|e| e.timestamp));
        Self { meta, elements }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if the series has elements and declares at least one
    /// requested information type.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.elements.is_empty() && !self.meta.information.is_empty()
    }

    /// Returns the most recent element.
    #[must_use]
    pub fn latest(&self) -> Option<&Element<T>> {
        self.elements.first()
    }

    /// Returns the value of `tag` at `index`, if both exist.
    #[must_use]
    pub fn value(&self, index: usize, tag: T) -> Option<f64> {
        self.elements.get(index).and_then(|e| e.get(tag))
    }

    /// Returns an iterator over the elements, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Element<T>> {
        self.elements.iter()
    }
}

/// Daily adjusted equity series.
pub type DailySeries = TimeSeries<DailyInformation>;
/// Intraday equity series.
pub type IntradaySeries = TimeSeries<IntradayInformation>;
/// Daily FX series.
pub type FxSeries = TimeSeries<FxInformation>;

/// A single dividend payment.
///
/// Dates the API reports as `None` are represented as `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    /// Ex-dividend date.
    pub ex_dividend_date: Option<NaiveDate>,
    /// Declaration date.
    pub declaration_date: Option<NaiveDate>,
    /// Record date.
    pub record_date: Option<NaiveDate>,
    /// Payment date.
    pub payment_date: Option<NaiveDate>,
    /// Amount paid per share.
    pub amount: f64,
}

/// Describes a [`DividendHistory`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividendMetadata {
    /// Symbol the dividends were paid on.
    pub symbol: Symbol,
    /// Latest record date in the history.
    pub last_refresh: Option<NaiveDate>,
    /// Range of ex-dividend dates.
    pub data_range: Option<DataRange>,
}

/// Dividend history, most recent payment first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    /// Details of the history.
    pub meta: DividendMetadata,
    /// Dividends sorted descending by payment date.
    pub elements: Vec<Dividend>,
}

impl DividendHistory {
    /// Creates a history, sorting by payment date (most recent first) and
    /// deriving the refresh date and ex-dividend range.
    #[must_use]
    pub fn new(symbol: Symbol, mut elements: Vec<Dividend>) -> Self {
        elements.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        let last_refresh = elements.iter().filter_map(|d| d.record_date).max();
        let data_range = DataRange::spanning(
            elements
                .iter()
                .filter_map(|d| d.ex_dividend_date)
                .map(crate::dates::date_to_utc),
        );
        Self {
            meta: DividendMetadata {
                symbol,
                last_refresh,
                data_range,
            },
            elements,
        }
    }

    /// Returns the number of dividends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no dividends.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Realtime exchange rate quote for a currency pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Base currency.
    pub from_currency: CurrencyCode,
    /// Base currency name.
    pub from_name: String,
    /// Quote currency.
    pub to_currency: CurrencyCode,
    /// Quote currency name.
    pub to_name: String,
    /// Time of the quote.
    pub last_refresh: DateTime<Utc>,
    /// Time zone the API reports the quote in.
    pub time_zone: String,
    /// Rate, bid and ask.
    pub data: BTreeMap<RateInformation, f64>,
}

impl ExchangeRate {
    /// Returns the value of `tag`, if present.
    #[must_use]
    pub fn get(&self, tag: RateInformation) -> Option<f64> {
        self.data.get(&tag).copied()
    }
}

/// Reference information for an active tradeable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingInfo {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Name of the security.
    pub name: String,
    /// Exchange, uppercased.
    pub exchange: String,
    /// Kind of tradeable.
    pub asset_type: AssetType,
    /// Date of IPO.
    pub ipo_date: NaiveDate,
    /// Date of delisting, if any.
    pub delisting_date: Option<NaiveDate>,
}

/// Active tradeables keyed by symbol.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Filters the listing was produced with.
    pub options: ListingOptions,
    /// Tradeables that passed the filters.
    pub tradeables: BTreeMap<Symbol, ListingInfo>,
}

impl Listing {
    /// Returns the number of tradeables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tradeables.len()
    }

    /// Returns true if nothing passed the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tradeables.is_empty()
    }

    /// Looks up a tradeable by symbol.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&ListingInfo> {
        self.tradeables.get(symbol)
    }
}
