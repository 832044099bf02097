//! Request options for each endpoint.
//!
//! Options are built with `with_*` methods. Methods that can receive an
//! out-of-range value return [`Result`] so an invalid request can never be
//! constructed.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::information::{DailyInformation, FxInformation, InformationTag, IntradayInformation};
use crate::interval::{AssetType, Interval};

/// Earliest year the intraday endpoint serves history for.
pub const EARLIEST_INTRADAY_YEAR: i32 = 2000;

fn checked_information<T: InformationTag>(information: &[T]) -> Result<Vec<T>> {
    if let Some(bad) = information.iter().find(|t| !t.is_valid()) {
        return Err(DataError::InvalidInformationType(bad.to_string()));
    }
    if information.is_empty() {
        return Ok(T::ALL.to_vec());
    }
    let mut out = Vec::with_capacity(information.len());
    for tag in information {
        if !out.contains(tag) {
            out.push(*tag);
        }
    }
    Ok(out)
}

/// Options for the daily adjusted equity series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOptions {
    /// Information types to extract. Default: all.
    pub information: Vec<DailyInformation>,
    /// Return the full history (20+ years) rather than the latest 100 points.
    pub full_history: bool,
}

impl Default for DailyOptions {
    fn default() -> Self {
        Self {
            information: DailyInformation::ALL.to_vec(),
            full_history: false,
        }
    }
}

impl DailyOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the full history.
    #[must_use]
    pub fn with_full_history(mut self, full: bool) -> Self {
        self.full_history = full;
        self
    }

    /// Restricts the extracted information types. An empty slice selects all.
    pub fn with_information(mut self, information: &[DailyInformation]) -> Result<Self> {
        self.information = checked_information(information)?;
        Ok(self)
    }

    /// Returns the `outputsize` query value.
    #[must_use]
    pub const fn output_size(&self) -> &'static str {
        if self.full_history { "full" } else { "compact" }
    }
}

/// Options for the intraday equity series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayOptions {
    /// Spacing between bars. Default: 5min.
    pub interval: Interval,
    /// Return split/dividend adjusted data. Default: true.
    pub adjusted: bool,
    /// Include pre and post market bars. Default: false.
    pub extended_hours: bool,
    /// Information types to extract. Default: all.
    pub information: Vec<IntradayInformation>,
    /// Return 30 days of bars rather than the latest 100. Default: false.
    pub full_output: bool,
    /// Month (`year`, `month`) to fetch history for. Default: latest.
    pub start_month: Option<(i32, u32)>,
}

impl Default for IntradayOptions {
    fn default() -> Self {
        Self {
            interval: Interval::FiveMinute,
            adjusted: true,
            extended_hours: false,
            information: IntradayInformation::ALL.to_vec(),
            full_output: false,
            start_month: None,
        }
    }
}

impl IntradayOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bar interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Requests adjusted data.
    #[must_use]
    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    /// Includes closed-market bars.
    #[must_use]
    pub fn with_extended_hours(mut self, extended: bool) -> Self {
        self.extended_hours = extended;
        self
    }

    /// Requests the full output size.
    #[must_use]
    pub fn with_full_output(mut self, full: bool) -> Self {
        self.full_output = full;
        self
    }

    /// Restricts the extracted information types. An empty slice selects all.
    pub fn with_information(mut self, information: &[IntradayInformation]) -> Result<Self> {
        self.information = checked_information(information)?;
        Ok(self)
    }

    /// Sets the month to fetch, any month from 2000-01 to the current year.
    pub fn with_start_month(mut self, year: i32, month: u32) -> Result<Self> {
        let current_year = Utc::now().year();
        if !(EARLIEST_INTRADAY_YEAR..=current_year).contains(&year) {
            return Err(DataError::InvalidParameter(format!(
                "invalid start year specified: {year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DataError::InvalidParameter(format!(
                "invalid start month specified: {month}"
            )));
        }
        self.start_month = Some((year, month));
        Ok(self)
    }

    /// Returns the `outputsize` query value.
    #[must_use]
    pub const fn output_size(&self) -> &'static str {
        if self.full_output { "full" } else { "compact" }
    }
}

/// Options for the daily FX series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxOptions {
    /// Information types to extract. Default: all.
    pub information: Vec<FxInformation>,
    /// Return the full history rather than the latest 100 points.
    pub full_history: bool,
}

impl Default for FxOptions {
    fn default() -> Self {
        Self {
            information: FxInformation::ALL.to_vec(),
            full_history: false,
        }
    }
}

impl FxOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the full history.
    #[must_use]
    pub fn with_full_history(mut self, full: bool) -> Self {
        self.full_history = full;
        self
    }

    /// Restricts the extracted information types. An empty slice selects all.
    pub fn with_information(mut self, information: &[FxInformation]) -> Result<Self> {
        self.information = checked_information(information)?;
        Ok(self)
    }

    /// Returns the `outputsize` query value.
    #[must_use]
    pub const fn output_size(&self) -> &'static str {
        if self.full_history { "full" } else { "compact" }
    }
}

/// Filters applied to the active listing.
///
/// Empty filters admit everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOptions {
    /// Only keep these asset types.
    pub asset_types: Vec<AssetType>,
    /// Only keep listings from these exchanges (uppercased).
    pub exchanges: Vec<String>,
}

impl ListingOptions {
    /// Creates options with no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to the given asset types.
    #[must_use]
    pub fn with_asset_types(mut self, types: &[AssetType]) -> Self {
        self.asset_types = types.to_vec();
        self
    }

    /// Restricts the listing to the named exchanges.
    #[must_use]
    pub fn with_exchanges<S: AsRef<str>>(mut self, exchanges: &[S]) -> Self {
        self.exchanges = exchanges
            .iter()
            .map(|e| e.as_ref().trim().to_uppercase())
            .collect();
        self
    }

    /// Returns true if a listing passes both filters.
    #[must_use]
    pub fn admits(&self, exchange: &str, asset_type: AssetType) -> bool {
        let exchange_ok = self.exchanges.is_empty() || self.exchanges.iter().any(|e| e == exchange);
        let type_ok = self.asset_types.is_empty() || self.asset_types.contains(&asset_type);
        exchange_ok && type_ok
    }
}
