//! Session facade over the configured providers.

use std::sync::Arc;

use alphav_client::{AlphaVantageProvider, ClientConfig};
use alphav_core::{
    CurrencyCode, DailyOptions, DailySeries, DataError, DividendHistory, EquityDataProvider,
    ExchangeRate, FxDataProvider, FxOptions, FxSeries, InformationTag, IntradayOptions,
    IntradaySeries, Listing, ListingOptions, ReferenceDataProvider, Result, Symbol, TimeSeries,
};
use alphav_window::{Calculations, WindowOptions, WindowedResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Entry point for fetching data and running windowed calculations.
///
/// A session holds one provider per data domain. [`Session::from_api_key`]
/// wires the Alpha Vantage provider into all of them; other providers can
/// be registered individually.
///
/// # Example
///
/// ```rust,ignore
/// use alphav::{Builtin, Calculations, CancellationToken, DailyInformation, DailyOptions,
///     Session, Symbol, WindowOptions};
/// use std::sync::Arc;
///
/// let session = Session::from_env()?;
/// let series = session
///     .historic_data(&Symbol::new("IBM"), &DailyOptions::new().with_full_history(true))
///     .await?;
///
/// let calcs = Calculations::new().with_builtin("pct", Builtin::PercentageChange);
/// let result = session
///     .windowed(
///         Arc::new(series),
///         15,
///         DailyInformation::AdjustedClose,
///         calcs,
///         WindowOptions::new(),
///         CancellationToken::new(),
///     )
///     .await?;
/// ```
#[derive(Clone, Default)]
pub struct Session {
    equity: Option<Arc<dyn EquityDataProvider>>,
    fx: Option<Arc<dyn FxDataProvider>>,
    reference: Option<Arc<dyn ReferenceDataProvider>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("equity", &self.equity.as_ref().map(|p| p.name()))
            .field("fx", &self.fx.as_ref().map(|p| p.name()))
            .field("reference", &self.reference.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl Session {
    /// Creates a session with no providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session backed by Alpha Vantage with `api_key`.
    ///
    /// Returns [`DataError::MissingApiKey`] if the key is blank.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key)?)
    }

    /// Creates a session backed by Alpha Vantage, keyed from `AV_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Creates a session backed by Alpha Vantage with `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let provider = Arc::new(AlphaVantageProvider::from_config(config)?);
        let mut session = Self::new();
        session.register_equity(provider.clone());
        session.register_fx(provider.clone());
        session.register_reference(provider);
        Ok(session)
    }

    /// Sets the equity provider.
    pub fn register_equity(&mut self, provider: Arc<dyn EquityDataProvider>) {
        debug!(provider = provider.name(), "Registering equity provider");
        self.equity = Some(provider);
    }

    /// Sets the FX provider.
    pub fn register_fx(&mut self, provider: Arc<dyn FxDataProvider>) {
        debug!(provider = provider.name(), "Registering FX provider");
        self.fx = Some(provider);
    }

    /// Sets the reference data provider.
    pub fn register_reference(&mut self, provider: Arc<dyn ReferenceDataProvider>) {
        debug!(provider = provider.name(), "Registering reference provider");
        self.reference = Some(provider);
    }

    fn equity(&self) -> Result<&Arc<dyn EquityDataProvider>> {
        self.equity.as_ref().ok_or_else(|| {
            DataError::ProviderNotConfigured("No equity provider registered".to_string())
        })
    }

    fn fx_provider(&self) -> Result<&Arc<dyn FxDataProvider>> {
        self.fx
            .as_ref()
            .ok_or_else(|| DataError::ProviderNotConfigured("No FX provider registered".to_string()))
    }

    fn reference(&self) -> Result<&Arc<dyn ReferenceDataProvider>> {
        self.reference.as_ref().ok_or_else(|| {
            DataError::ProviderNotConfigured("No reference provider registered".to_string())
        })
    }

    /// Fetches the daily adjusted series for `symbol`.
    #[instrument(skip(self, options), fields(symbol = %symbol))]
    pub async fn historic_data(
        &self,
        symbol: &Symbol,
        options: &DailyOptions,
    ) -> Result<DailySeries> {
        self.equity()?.fetch_daily(symbol, options).await
    }

    /// Fetches the intraday series for `symbol`.
    #[instrument(skip(self, options), fields(symbol = %symbol))]
    pub async fn intraday_data(
        &self,
        symbol: &Symbol,
        options: &IntradayOptions,
    ) -> Result<IntradaySeries> {
        self.equity()?.fetch_intraday(symbol, options).await
    }

    /// Fetches the dividend history for `symbol`.
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub async fn dividends(&self, symbol: &Symbol) -> Result<DividendHistory> {
        self.equity()?.fetch_dividends(symbol).await
    }

    /// Fetches the daily FX series for a currency pair.
    #[instrument(skip(self, options), fields(from = %from, to = %to))]
    pub async fn fx(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        options: &FxOptions,
    ) -> Result<FxSeries> {
        self.fx_provider()?.fetch_fx_daily(from, to, options).await
    }

    /// Fetches the realtime exchange rate for a currency pair.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub async fn intraday_fx(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate> {
        self.fx_provider()?.fetch_exchange_rate(from, to).await
    }

    /// Fetches the active listing.
    #[instrument(skip(self, options))]
    pub async fn active_listing(&self, options: &ListingOptions) -> Result<Listing> {
        self.reference()?.fetch_active_listing(options).await
    }

    /// Runs [`alphav_window::compute`] on the blocking thread pool.
    ///
    /// Cancelling `cancel` stops the calculation at the next offset with
    /// [`DataError::ContextEnded`].
    #[instrument(skip_all, fields(window_length = window_length, tag = %tag))]
    pub async fn windowed<T: InformationTag>(
        &self,
        series: Arc<TimeSeries<T>>,
        window_length: usize,
        tag: T,
        calculations: Calculations<T>,
        options: WindowOptions,
        cancel: CancellationToken,
    ) -> Result<WindowedResult<T>> {
        tokio::task::spawn_blocking(move || {
            alphav_window::compute(&series, window_length, tag, &calculations, options, &cancel)
        })
        .await
        .map_err(|e| DataError::Other(format!("windowed calculation task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphav_client::parse;
    use alphav_core::{DailyInformation, DataProvider, Interval};
    use alphav_window::Builtin;
    use async_trait::async_trait;

    const IBM_HISTORY: &str = include_str!("../../alphav-client/testdata/ibm_history.json");
    const IBM_DIVIDENDS: &str = include_str!("../../alphav-client/testdata/ibm_dividends.json");

    /// Serves the IBM fixtures.
    #[derive(Debug)]
    struct FixtureProvider;

    impl DataProvider for FixtureProvider {
        fn name(&self) -> &str {
            "fixture"
        }

        fn description(&self) -> &str {
            "Saved responses"
        }

        fn supported_intervals(&self) -> &[Interval] {
            &[]
        }
    }

    #[async_trait]
    impl EquityDataProvider for FixtureProvider {
        async fn fetch_daily(&self, symbol: &Symbol, options: &DailyOptions) -> Result<DailySeries> {
            if symbol.as_str() != "IBM" {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            parse::daily(IBM_HISTORY, options)
        }

        async fn fetch_intraday(
            &self,
            _symbol: &Symbol,
            _options: &IntradayOptions,
        ) -> Result<IntradaySeries> {
            Err(DataError::Other("not saved".to_string()))
        }

        async fn fetch_dividends(&self, _symbol: &Symbol) -> Result<DividendHistory> {
            parse::dividends(IBM_DIVIDENDS)
        }
    }

    fn fixture_session() -> Session {
        let mut session = Session::new();
        session.register_equity(Arc::new(FixtureProvider));
        session
    }

    #[test]
    fn test_blank_api_key() {
        assert!(matches!(
            Session::from_api_key(" "),
            Err(DataError::MissingApiKey)
        ));
    }

    #[test]
    fn test_from_api_key_registers_everything() {
        let session = Session::from_api_key("demo").unwrap();
        let debug_str = format!("{session:?}");
        assert_eq!(debug_str.matches("Alpha Vantage").count(), 3);
        assert!(!debug_str.contains("demo"));
    }

    #[tokio::test]
    async fn test_unconfigured_providers() {
        let session = Session::new();
        let eur = CurrencyCode::new("EUR");
        let usd = CurrencyCode::new("USD");

        assert!(matches!(
            session
                .historic_data(&Symbol::new("IBM"), &DailyOptions::new())
                .await,
            Err(DataError::ProviderNotConfigured(_))
        ));
        assert!(matches!(
            session.intraday_fx(&eur, &usd).await,
            Err(DataError::ProviderNotConfigured(_))
        ));
        assert!(matches!(
            session.active_listing(&ListingOptions::new()).await,
            Err(DataError::ProviderNotConfigured(_))
        ));

        // Registering equity leaves FX unconfigured.
        assert!(matches!(
            fixture_session().fx(&eur, &usd, &FxOptions::new()).await,
            Err(DataError::ProviderNotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_through_session() {
        let session = fixture_session();
        let series = session
            .historic_data(&Symbol::new("ibm"), &DailyOptions::new())
            .await
            .unwrap();
        assert_eq!(series.len(), 60);

        let history = session.dividends(&Symbol::new("IBM")).await.unwrap();
        assert_eq!(history.elements[0].amount, 1.68);

        assert!(matches!(
            session
                .historic_data(&Symbol::new("MSFT"), &DailyOptions::new())
                .await,
            Err(DataError::SymbolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_windowed_runs_on_blocking_pool() {
        let session = fixture_session();
        let series = session
            .historic_data(&Symbol::new("IBM"), &DailyOptions::new())
            .await
            .unwrap();
        let len = series.len();

        let result = session
            .windowed(
                Arc::new(series),
                5,
                DailyInformation::AdjustedClose,
                Calculations::new().with_builtin("avg", Builtin::Average),
                WindowOptions::new(),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(result.get("avg").unwrap().len(), len - 5);
    }

    #[tokio::test]
    async fn test_windowed_cancelled() {
        let session = fixture_session();
        let series = session
            .historic_data(&Symbol::new("IBM"), &DailyOptions::new())
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = session
            .windowed(
                Arc::new(series),
                5,
                DailyInformation::AdjustedClose,
                Calculations::new().with_builtin("avg", Builtin::Average),
                WindowOptions::new(),
                cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::ContextEnded));
    }
}
