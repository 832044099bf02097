#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the Alpha Vantage client.
//!
//! - [`EquityDataProvider`](provider::EquityDataProvider) - Daily/intraday series and dividends
//! - [`FxDataProvider`](provider::FxDataProvider) - FX series and exchange rates
//! - [`ReferenceDataProvider`](provider::ReferenceDataProvider) - Active listings
//! - [`TimeSeries`](types::TimeSeries) - Ordered, most-recent-first series

/// Date parsing for API payloads.
pub mod dates;
/// Error types for data operations.
pub mod error;
/// DataFrame export.
pub mod frame;
/// Information types per data domain.
pub mod information;
/// Intraday intervals and listing asset types.
pub mod interval;
/// Rounding helpers.
pub mod math;
/// Request options.
pub mod options;
/// Provider traits for fetching market data.
pub mod provider;
/// Core data types (Symbol, TimeSeries, Listing, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{DataError, Result};
pub use information::{
    DailyInformation, FxInformation, InformationTag, IntradayInformation, RateInformation,
};
pub use interval::{AssetType, Interval};
pub use options::{DailyOptions, FxOptions, IntradayOptions, ListingOptions};
pub use provider::{DataProvider, EquityDataProvider, FxDataProvider, ReferenceDataProvider};
pub use types::{
    CurrencyCode, DailySeries, DataRange, Dividend, DividendHistory, DividendMetadata, Element,
    ExchangeRate, FxSeries, Instrument, IntradaySeries, Listing, ListingInfo, Metadata, Symbol,
    TimeSeries,
};
