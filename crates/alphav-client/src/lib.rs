#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage data provider.
//!
//! This crate implements the alphav-core provider traits for the
//! [Alpha Vantage](https://www.alphavantage.co/) query API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use alphav_client::AlphaVantageProvider;
//! use alphav_core::{DailyOptions, EquityDataProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> alphav_core::Result<()> {
//!     let provider = AlphaVantageProvider::new("your_api_key")?;
//!
//!     let options = DailyOptions::new().with_full_history(true);
//!     let series = provider.fetch_daily(&Symbol::new("IBM"), &options).await?;
//!     println!("{}", series.to_dataframe()?);
//!
//!     Ok(())
//! }
//! ```

/// Client configuration.
pub mod config;
/// Response body parsers.
pub mod parse;

pub use config::ClientConfig;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alphav_core::{
    CurrencyCode, DailyOptions, DailySeries, DataError, DataProvider, DividendHistory,
    EquityDataProvider, ExchangeRate, FxDataProvider, FxOptions, FxSeries, Interval,
    IntradayOptions, IntradaySeries, Listing, ListingOptions, ReferenceDataProvider, Result,
    Symbol,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Name reported by [`DataProvider::name`] and in rate limit errors.
const PROVIDER_NAME: &str = "Alpha Vantage";

/// Alpha Vantage data provider.
///
/// Implements [`EquityDataProvider`], [`FxDataProvider`] and
/// [`ReferenceDataProvider`]. Requests are spaced by
/// [`ClientConfig::min_request_interval`]; nothing is retried.
pub struct AlphaVantageProvider {
    client: Client,
    config: ClientConfig,
    last_request_ms: AtomicU64,
}

impl fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl AlphaVantageProvider {
    /// Creates a provider for `api_key` with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key)?)
    }

    /// Creates a provider from the `AV_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Creates a provider from a configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DataError::Network(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a provider with a custom HTTP client.
    ///
    /// The client's own timeout applies instead of the configured one.
    #[must_use]
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            config,
            last_request_ms: AtomicU64::new(0),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds a query URL for `function` with `params`, API key last.
    fn url(&self, function: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(self.config.base_url())
            .map_err(|e| DataError::InvalidParameter(format!("invalid base url: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("function", function);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("apikey", self.config.api_key());
        }
        Ok(url)
    }

    /// Waits until the minimum request spacing has elapsed.
    async fn throttle(&self) {
        let min_ms = self.config.min_request_interval().as_millis() as u64;
        if min_ms == 0 {
            return;
        }

        let now = now_ms();
        let last = self.last_request_ms.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);
        if elapsed < min_ms {
            let wait = min_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait);
            sleep(Duration::from_millis(wait)).await;
        }
        self.last_request_ms.store(now_ms(), Ordering::Relaxed);
    }

    /// Makes a GET request and returns the body text.
    ///
    /// The URL is never logged since it carries the API key.
    async fn get(&self, function: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.url(function, params)?;
        self.throttle().await;
        debug!(function, "Alpha Vantage request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!(function, "rate limited");
            return Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Network(format!("HTTP {status}: {text}")));
        }

        response
            .text()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn month_param(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Alpha Vantage - equity, FX and reference data API"
    }

    fn supported_intervals(&self) -> &[Interval] {
        Interval::ALL
    }
}

#[async_trait]
impl EquityDataProvider for AlphaVantageProvider {
    #[instrument(skip(self, options), fields(symbol = %symbol))]
    async fn fetch_daily(&self, symbol: &Symbol, options: &DailyOptions) -> Result<DailySeries> {
        let body = self
            .get(
                "TIME_SERIES_DAILY_ADJUSTED",
                &[
                    ("symbol", symbol.to_string()),
                    ("outputsize", options.output_size().to_string()),
                ],
            )
            .await?;
        let series = parse::daily(&body, options)?;
        debug!(elements = series.len(), "parsed daily series");
        Ok(series)
    }

    #[instrument(skip(self, options), fields(symbol = %symbol, interval = %options.interval))]
    async fn fetch_intraday(
        &self,
        symbol: &Symbol,
        options: &IntradayOptions,
    ) -> Result<IntradaySeries> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", options.interval.to_string()),
            ("adjusted", options.adjusted.to_string()),
            ("extended_hours", options.extended_hours.to_string()),
            ("outputsize", options.output_size().to_string()),
        ];
        if let Some((year, month)) = options.start_month {
            params.push(("month", month_param(year, month)));
        }

        let body = self.get("TIME_SERIES_INTRADAY", &params).await?;
        let series = parse::intraday(&body, options)?;
        debug!(elements = series.len(), "parsed intraday series");
        Ok(series)
    }

    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn fetch_dividends(&self, symbol: &Symbol) -> Result<DividendHistory> {
        let body = self
            .get("DIVIDENDS", &[("symbol", symbol.to_string())])
            .await?;
        parse::dividends(&body)
    }
}

#[async_trait]
impl FxDataProvider for AlphaVantageProvider {
    #[instrument(skip(self, options), fields(from = %from, to = %to))]
    async fn fetch_fx_daily(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        options: &FxOptions,
    ) -> Result<FxSeries> {
        let body = self
            .get(
                "FX_DAILY",
                &[
                    ("from_symbol", from.to_string()),
                    ("to_symbol", to.to_string()),
                    ("outputsize", options.output_size().to_string()),
                ],
            )
            .await?;
        parse::fx_daily(&body, options)
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn fetch_exchange_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate> {
        let body = self
            .get(
                "CURRENCY_EXCHANGE_RATE",
                &[
                    ("from_currency", from.to_string()),
                    ("to_currency", to.to_string()),
                ],
            )
            .await?;
        parse::exchange_rate(&body)
    }
}

#[async_trait]
impl ReferenceDataProvider for AlphaVantageProvider {
    #[instrument(skip(self, options))]
    async fn fetch_active_listing(&self, options: &ListingOptions) -> Result<Listing> {
        let body = self
            .get("LISTING_STATUS", &[("state", "active".to_string())])
            .await?;
        let listing = parse::listing(&body, options)?;
        debug!(tradeables = listing.len(), "parsed listing");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AlphaVantageProvider {
        AlphaVantageProvider::new("test_key").unwrap()
    }

    #[test]
    fn test_url_building() {
        let provider = provider();
        let url = provider
            .url(
                "TIME_SERIES_DAILY_ADJUSTED",
                &[
                    ("symbol", "IBM".to_string()),
                    ("outputsize", "full".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY_ADJUSTED&symbol=IBM&outputsize=full&apikey=test_key"
        );
    }

    #[test]
    fn test_url_escapes_values() {
        let url = provider()
            .url("DIVIDENDS", &[("symbol", "BRK B&x".to_string())])
            .unwrap();
        assert!(url.as_str().contains("symbol=BRK+B%26x"));
    }

    #[test]
    fn test_url_uses_configured_base() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_base_url("http://127.0.0.1:9000/query");
        let provider = AlphaVantageProvider::from_config(config).unwrap();
        let url = provider.url("LISTING_STATUS", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/query?function=LISTING_STATUS&apikey=k"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("k").unwrap().with_base_url("not a url");
        let provider = AlphaVantageProvider::from_config(config).unwrap();
        assert!(matches!(
            provider.url("DIVIDENDS", &[]),
            Err(DataError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_month_param() {
        assert_eq!(month_param(2009, 1), "2009-01");
        assert_eq!(month_param(2024, 12), "2024-12");
    }

    #[test]
    fn test_provider_metadata() {
        let provider = provider();
        assert_eq!(provider.name(), "Alpha Vantage");
        assert!(!provider.description().is_empty());
        assert_eq!(provider.supported_intervals().len(), 5);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = AlphaVantageProvider::new("secret_key_12345").unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_throttle_spaces_requests() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_min_request_interval(Duration::from_millis(50));
        let provider = AlphaVantageProvider::from_config(config).unwrap();

        let start = std::time::Instant::now();
        provider.throttle().await;
        provider.throttle().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_throttle_disabled_by_default() {
        let provider = provider();
        let start = std::time::Instant::now();
        provider.throttle().await;
        provider.throttle().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
