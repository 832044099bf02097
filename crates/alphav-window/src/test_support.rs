//! Series builders shared by the unit tests.

use alphav_core::{DailyInformation, DailySeries, Element, Instrument, Metadata, Symbol};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn day(back: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap() - Duration::days(back as i64)
}

fn meta() -> Metadata<DailyInformation> {
    Metadata::new(
        vec![DailyInformation::Close, DailyInformation::AdjustedClose],
        Instrument::Equity(Symbol::new("TEST")),
        day(0),
        "US/Eastern",
    )
}

/// Series whose close and adjusted close are `values`, most recent first.
pub(crate) fn daily_series(values: &[f64]) -> DailySeries {
    let elements = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            Element::new(day(i))
                .with(DailyInformation::Close, *v)
                .with(DailyInformation::AdjustedClose, *v)
        })
        .collect();
    DailySeries::new(meta(), elements)
}

/// Like [`daily_series`], but element `gap` has no adjusted close.
pub(crate) fn daily_series_with_gap(values: &[f64], gap: usize) -> DailySeries {
    let mut series = daily_series(values);
    series.elements[gap]
        .data
        .remove(&DailyInformation::AdjustedClose);
    series
}

/// Series of `n` elements with values `n, n - 1, .., 1`.
pub(crate) fn ramp(n: usize) -> DailySeries {
    let values: Vec<f64> = (0..n).map(|i| (n - i) as f64).collect();
    daily_series(&values)
}
