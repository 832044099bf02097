//! Provider traits for fetching market data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`EquityDataProvider`] - Daily and intraday equity series, dividends
//! - [`FxDataProvider`] - Daily FX series and realtime exchange rates
//! - [`ReferenceDataProvider`] - Active listing metadata

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{DataError, Result},
    interval::Interval,
    options::{DailyOptions, FxOptions, IntradayOptions, ListingOptions},
    types::{
        CurrencyCode, DailySeries, DividendHistory, ExchangeRate, FxSeries, IntradaySeries,
        Listing, Symbol,
    },
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Alpha Vantage").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;

    /// Returns the intraday intervals supported by this provider.
    fn supported_intervals(&self) -> &[Interval];
}

/// Provider for equity time series and dividends.
#[async_trait]
pub trait EquityDataProvider: DataProvider {
    /// Fetches the daily adjusted series for a symbol, most recent first.
    async fn fetch_daily(&self, symbol: &Symbol, options: &DailyOptions) -> Result<DailySeries>;

    /// Fetches the intraday series for a symbol, most recent first.
    async fn fetch_intraday(
        &self,
        symbol: &Symbol,
        options: &IntradayOptions,
    ) -> Result<IntradaySeries>;

    /// Fetches the dividend history for a symbol, most recent payment first.
    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<DividendHistory>;

    /// Fetches daily series for multiple symbols.
    ///
    /// Default implementation calls `fetch_daily` sequentially for each symbol,
    /// skipping symbols the provider does not know.
    async fn fetch_daily_batch(
        &self,
        symbols: &[Symbol],
        options: &DailyOptions,
    ) -> Result<Vec<DailySeries>> {
        let mut out = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            match self.fetch_daily(symbol, options).await {
                Ok(series) => out.push(series),
                Err(DataError::SymbolNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(out)
    }
}

/// Provider for foreign exchange data.
#[async_trait]
pub trait FxDataProvider: DataProvider {
    /// Fetches the daily series for a currency pair, most recent first.
    async fn fetch_fx_daily(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        options: &FxOptions,
    ) -> Result<FxSeries>;

    /// Fetches the realtime exchange rate for a currency pair.
    async fn fetch_exchange_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate>;
}

/// Provider for reference data.
#[async_trait]
pub trait ReferenceDataProvider: DataProvider {
    /// Fetches the currently active listings that pass `options`.
    async fn fetch_active_listing(&self, options: &ListingOptions) -> Result<Listing>;
}
