//! The windowed calculation engine.

use std::collections::BTreeMap;

use alphav_core::{DataError, InformationTag, Result, TimeSeries};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::calculations::Calculations;
use crate::options::WindowOptions;
use crate::result::{WindowedMeta, WindowedResult};

/// Runs every calculation in `calculations` over sliding windows of
/// `series`.
///
/// For each offset `0..limit` each function is called with
/// `(series, offset, window_length, tag)`, where `limit` is
/// `series.len() - window_length` capped by the processing limit in
/// `options`. Every output sequence therefore has length `limit`.
///
/// Inputs are checked in this order, failing on the first problem:
///
/// 1. the series has elements and information types ([`DataError::InvalidData`])
/// 2. `tag` is a known information type ([`DataError::InvalidInformationType`])
/// 3. `tag` was requested for the series ([`DataError::MissingInformationType`])
/// 4. `0 < window_length <= series.len()` ([`DataError::InvalidWindowLength`])
/// 5. an empty `calculations` returns an empty result
/// 6. every name has a function ([`DataError::MissingCalculation`])
///
/// `cancel` is polled before each offset. Once cancelled, the call returns
/// [`DataError::ContextEnded`] and partial output is discarded.
#[instrument(
    skip_all,
    fields(instrument = %series.meta.instrument, window_length = window_length, tag = %tag)
)]
pub fn compute<T: InformationTag>(
    series: &TimeSeries<T>,
    window_length: usize,
    tag: T,
    calculations: &Calculations<T>,
    options: WindowOptions,
    cancel: &CancellationToken,
) -> Result<WindowedResult<T>> {
    if !series.is_valid() {
        return Err(DataError::InvalidData);
    }
    check_tag(series, tag)?;
    check_window_length(series, window_length)?;

    let limit = options.effective_limit(series.len() - window_length);
    let mut result = WindowedResult {
        meta: WindowedMeta {
            instrument: series.meta.instrument.clone(),
            input_len: series.len(),
            input_range: series.meta.data_range,
            window_length,
            information: tag,
            calculations: calculations.names().map(str::to_string).collect(),
            options: WindowOptions {
                element_processing_limit: Some(limit),
            },
        },
        series: BTreeMap::new(),
    };

    if calculations.is_empty() {
        debug!("no calculations requested");
        return Ok(result);
    }
    if let Some(name) = calculations.first_unbound() {
        return Err(DataError::MissingCalculation(name.to_string()));
    }

    debug!(
        calculations = calculations.len(),
        offsets = limit,
        "running windowed calculation"
    );

    let bound: Vec<_> = calculations.bound().collect();
    let mut columns: Vec<Vec<_>> = bound.iter().map(|_| Vec::with_capacity(limit)).collect();

    for offset in 0..limit {
        if cancel.is_cancelled() {
            return Err(DataError::ContextEnded);
        }
        for ((_, function), column) in bound.iter().zip(columns.iter_mut()) {
            column.push(function.compute(series, offset, window_length, tag));
        }
    }

    result.series = bound
        .iter()
        .map(|(name, _)| (*name).to_string())
        .zip(columns)
        .collect();
    Ok(result)
}

/// Like [`compute`], with the information type given by name.
///
/// Names match case-insensitively against the tag name or its API field
/// (`"adjusted close"` or `"5. adjusted close"`). Unknown names fail with
/// [`DataError::InvalidInformationType`].
pub fn compute_by_name<T: InformationTag>(
    series: &TimeSeries<T>,
    window_length: usize,
    tag: &str,
    calculations: &Calculations<T>,
    options: WindowOptions,
    cancel: &CancellationToken,
) -> Result<WindowedResult<T>> {
    if !series.is_valid() {
        return Err(DataError::InvalidData);
    }
    let tag: T = tag.parse()?;
    compute(series, window_length, tag, calculations, options, cancel)
}

fn check_tag<T: InformationTag>(series: &TimeSeries<T>, tag: T) -> Result<()> {
    if !tag.is_valid() {
        return Err(DataError::InvalidInformationType(tag.to_string()));
    }
    if !series.meta.contains(tag) {
        return Err(DataError::MissingInformationType(tag.to_string()));
    }
    Ok(())
}

fn check_window_length<T: InformationTag>(
    series: &TimeSeries<T>,
    window_length: usize,
) -> Result<()> {
    if window_length == 0 || window_length > series.len() {
        return Err(DataError::InvalidWindowLength {
            window_length,
            series_length: series.len(),
        });
    }
    Ok(())
}
