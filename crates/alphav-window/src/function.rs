//! Window functions.
//!
//! A window function maps `(series, offset, window_length, tag)` to a single
//! [`WindowedElement`]. Series are ordered most recent first, so `offset` is
//! the newest end of the window:
//!
//! - averaging functions read `offset .. offset + window_length`
//! - change functions compare `offset` against `offset + window_length`
//!
//! Functions do not bounds-check. The engine guarantees
//! `offset + window_length < series.len()` before calling them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use alphav_core::{DataError, InformationTag, TimeSeries};

use crate::result::WindowedElement;

/// A calculation performed over one window of a series.
///
/// Implemented for the built-in functions and for any closure with the
/// signature `Fn(&TimeSeries<T>, usize, usize, T) -> WindowedElement`.
pub trait WindowFunction<T: InformationTag>: Send + Sync {
    /// Computes the result for the window anchored at `offset`.
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement;
}

impl<T, F> WindowFunction<T> for F
where
    T: InformationTag,
    F: Fn(&TimeSeries<T>, usize, usize, T) -> WindowedElement + Send + Sync,
{
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement {
        self(series, offset, window_length, tag)
    }
}

/// Sum and sum of squares over the window, skipping elements without `tag`.
fn accumulate<T: InformationTag>(
    series: &TimeSeries<T>,
    offset: usize,
    window_length: usize,
    tag: T,
) -> (f64, f64) {
    series.elements[offset..offset + window_length]
        .iter()
        .filter_map(|e| e.get(tag))
        .fold((0.0, 0.0), |(sum, sq), v| (sum + v, sq + v * v))
}

/// Value of `tag` at `index`; NaN when the element lacks it.
fn endpoint<T: InformationTag>(series: &TimeSeries<T>, index: usize, tag: T) -> f64 {
    series.elements[index].get(tag).unwrap_or(f64::NAN)
}

/// Arithmetic mean of the window.
///
/// Elements missing `tag` contribute nothing, but the divisor stays
/// `window_length`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowAverage;

impl<T: InformationTag> WindowFunction<T> for WindowAverage {
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement {
        let (sum, _) = accumulate(series, offset, window_length, tag);
        WindowedElement {
            window_start: series.elements[offset].timestamp,
            value: sum / window_length as f64,
        }
    }
}

/// Population variance of the window, computed as `E[x^2] - E[x]^2`.
///
/// This single-pass form loses precision when the mean is large relative to
/// the spread. Missing values are skipped as in [`WindowAverage`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowVariance;

impl<T: InformationTag> WindowFunction<T> for WindowVariance {
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement {
        let (sum, sq) = accumulate(series, offset, window_length, tag);
        let n = window_length as f64;
        let mean = sum / n;
        WindowedElement {
            window_start: series.elements[offset].timestamp,
            value: sq / n - mean * mean,
        }
    }
}

/// Percentage change from the older boundary to `offset`.
///
/// `100 * (v[offset] / v[offset + window_length] - 1)`; growth is positive.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowPercentageChange;

impl<T: InformationTag> WindowFunction<T> for WindowPercentageChange {
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement {
        let newer = endpoint(series, offset, tag);
        let older = endpoint(series, offset + window_length, tag);
        WindowedElement {
            window_start: series.elements[offset].timestamp,
            value: 100.0 * (newer / older - 1.0),
        }
    }
}

/// Absolute change from the older boundary to `offset`.
///
/// `v[offset] - v[offset + window_length]`; growth is positive.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowChange;

impl<T: InformationTag> WindowFunction<T> for WindowChange {
    fn compute(
        &self,
        series: &TimeSeries<T>,
        offset: usize,
        window_length: usize,
        tag: T,
    ) -> WindowedElement {
        WindowedElement {
            window_start: series.elements[offset].timestamp,
            value: endpoint(series, offset, tag) - endpoint(series, offset + window_length, tag),
        }
    }
}

/// The built-in window functions, addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// [`WindowAverage`].
    Average,
    /// [`WindowVariance`].
    Variance,
    /// [`WindowPercentageChange`].
    PercentageChange,
    /// [`WindowChange`].
    Change,
}

impl Builtin {
    /// Every built-in function.
    pub const ALL: &'static [Self] = &[
        Self::Average,
        Self::Variance,
        Self::PercentageChange,
        Self::Change,
    ];

    /// Name used to look the function up.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Variance => "variance",
            Self::PercentageChange => "percentage_change",
            Self::Change => "change",
        }
    }

    /// Returns the function as a shareable trait object.
    #[must_use]
    pub fn function<T: InformationTag>(&self) -> Arc<dyn WindowFunction<T>> {
        match self {
            Self::Average => Arc::new(WindowAverage),
            Self::Variance => Arc::new(WindowVariance),
            Self::PercentageChange => Arc::new(WindowPercentageChange),
            Self::Change => Arc::new(WindowChange),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Builtin {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataError::InvalidParameter(format!("unknown window function: {s}")))
    }
}
