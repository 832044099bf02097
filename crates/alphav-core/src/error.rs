//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers every failure that can occur
//! when fetching or parsing Alpha Vantage data, or when running windowed
//! calculations over a fetched series.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, timeouts, HTTP status, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by the API.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The API answered with an error or information message instead of data.
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be decoded at all.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The metadata block of a response is missing or malformed.
    #[error("Invalid metadata received: {0}")]
    MetadataParse(String),

    /// The time series block of a response is missing or malformed.
    #[error("Invalid time series received: {0}")]
    TimeSeriesParse(String),

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The supplied series is empty or carries no requested information types.
    #[error("invalid data provided for window calculation")]
    InvalidData,

    /// The information type is not part of its domain's enumeration.
    #[error("invalid information type specified: {0}")]
    InvalidInformationType(String),

    /// The information type is valid but was not populated in the series.
    #[error("missing information type in data for window calculation: {0}")]
    MissingInformationType(String),

    /// The window length cannot be accommodated by the series.
    #[error(
        "window length must be greater than zero and less than or equal to the length of the time series (got {window_length}, series length {series_length})"
    )]
    InvalidWindowLength {
        /// The requested window length.
        window_length: usize,
        /// Number of elements in the series.
        series_length: usize,
    },

    /// A named calculation has no function attached.
    #[error("calculation function is missing for {0}")]
    MissingCalculation(String),

    /// Cancellation was requested before the calculation completed.
    #[error("context ended before completion")]
    ContextEnded,

    /// An unknown intraday interval was specified.
    #[error("invalid interval specified: {0}")]
    InvalidInterval(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No API key was supplied.
    #[error("no valid api key configured")]
    MissingApiKey,

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
