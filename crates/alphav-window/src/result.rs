//! Output of a windowed calculation.

use std::collections::BTreeMap;

use alphav_core::frame::{column_name, timestamp_column};
use alphav_core::{DataError, DataRange, InformationTag, Instrument, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::options::WindowOptions;

/// Name of the window start column in exported frames.
pub const WINDOW_START_COLUMN: &str = "window_start";

/// One computed value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowedElement {
    /// Timestamp of the element at the window's offset (the newest end).
    pub window_start: DateTime<Utc>,
    /// Computed value. May be NaN or infinite for degenerate inputs.
    pub value: f64,
}

/// Describes how a [`WindowedResult`] was produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowedMeta<T> {
    /// Instrument of the input series.
    pub instrument: Instrument,
    /// Number of elements in the input series.
    pub input_len: usize,
    /// Timestamp range of the input series.
    pub input_range: Option<DataRange>,
    /// Window length used.
    pub window_length: usize,
    /// Information type the calculations read.
    pub information: T,
    /// Names of the calculations, in output order.
    pub calculations: Vec<String>,
    /// Options in effect, with the processing limit after clamping.
    pub options: WindowOptions,
}

/// Result of a windowed calculation: one sequence per calculation name.
///
/// Every sequence has the same length, and index `i` of each corresponds to
/// offset `i` of the input series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowedResult<T> {
    /// How the result was produced.
    pub meta: WindowedMeta<T>,
    /// Computed sequences keyed by calculation name.
    pub series: BTreeMap<String, Vec<WindowedElement>>,
}

impl<T: InformationTag> WindowedResult<T> {
    /// Returns the sequence for a calculation.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[WindowedElement]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Returns the number of offsets computed, zero when there were no
    /// calculations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.values().next().map_or(0, Vec::len)
    }

    /// Returns true if nothing was computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exports the result as a DataFrame.
    ///
    /// Columns: `window_start`, then one `f64` column per calculation in name
    /// order. Rows are offsets, most recent first.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.series.len() + 1);

        let millis: Vec<i64> = self
            .series
            .values()
            .next()
            .map(|seq| seq.iter().map(|e| e.window_start.timestamp_millis()).collect())
            .unwrap_or_default();
        columns.push(timestamp_column(WINDOW_START_COLUMN, millis)?);

        for (name, seq) in &self.series {
            let values: Vec<f64> = seq.iter().map(|e| e.value).collect();
            columns.push(Column::new(
                PlSmallStr::from(column_name(name).as_str()),
                values,
            ));
        }

        DataFrame::new(columns).map_err(|e| DataError::Other(e.to_string()))
    }
}
