//! Conversion of series into polars DataFrames.

use polars::prelude::*;

use crate::{
    error::{DataError, Result},
    information::InformationTag,
    types::TimeSeries,
};

/// Name of the timestamp column in exported frames.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Builds a millisecond-precision datetime column.
pub fn timestamp_column(name: &str, millis: Vec<i64>) -> Result<Column> {
    Column::new(PlSmallStr::from(name), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .map_err(|e| DataError::Other(e.to_string()))
}

/// Turns a human tag name into a column name (`adjusted close` -> `adjusted_close`).
#[must_use]
pub fn column_name(name: &str) -> String {
    name.replace(' ', "_")
}

impl<T: InformationTag> TimeSeries<T> {
    /// Exports the series as a DataFrame.
    ///
    /// Columns: `timestamp`, then one `f64` column per requested information
    /// type in request order. Rows keep the series order (most recent first);
    /// absent values are null.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.meta.information.len() + 1);

        let millis: Vec<i64> = self
            .elements
            .iter()
            .map(|e| e.timestamp.timestamp_millis())
            .collect();
        columns.push(timestamp_column(TIMESTAMP_COLUMN, millis)?);

        for tag in &self.meta.information {
            let values: Vec<Option<f64>> = self.elements.iter().map(|e| e.get(*tag)).collect();
            columns.push(Column::new(
                PlSmallStr::from(column_name(tag.name()).as_str()),
                values,
            ));
        }

        DataFrame::new(columns).map_err(|e| DataError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        information::DailyInformation,
        types::{Element, Instrument, Metadata, Symbol},
    };
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_series_to_dataframe() {
        let t0 = Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 8, 18, 0, 0, 0).unwrap();
        let meta = Metadata::new(
            vec![DailyInformation::Close, DailyInformation::AdjustedClose],
            Instrument::Equity(Symbol::new("IBM")),
            t0,
            "US/Eastern",
        );
        let series = TimeSeries::new(
            meta,
            vec![
                Element::new(t0)
                    .with(DailyInformation::Close, 2.0)
                    .with(DailyInformation::AdjustedClose, 2.5),
                Element::new(t1).with(DailyInformation::Close, 1.0),
            ],
        );

        let df = series.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);

        let adjusted = df.column("adjusted_close").unwrap();
        assert_eq!(adjusted.null_count(), 1);
        let close = df.column("close").unwrap().f64().unwrap();
        assert_eq!(close.get(0), Some(2.0));
    }
}
