//! Parsers for Alpha Vantage response bodies.
//!
//! Every function takes the raw body text, so responses saved to disk can be
//! parsed without a network connection. Series come back most recent first.
//!
//! Errors are classified by where the body went wrong:
//!
//! - the API returned `Error Message` or `Information`: [`DataError::Api`]
//! - the body is not valid JSON/CSV: [`DataError::Parse`]
//! - the `Meta Data` block is missing or malformed: [`DataError::MetadataParse`]
//! - the series block is missing or malformed: [`DataError::TimeSeriesParse`]

use std::collections::BTreeMap;

use alphav_core::dates::{parse_date, parse_date_utc, parse_timestamp};
use alphav_core::{
    AssetType, CurrencyCode, DailyOptions, DailySeries, DataError, Dividend, DividendHistory, Element,
    ExchangeRate, FxOptions, FxSeries, InformationTag, Instrument, Interval, IntradayOptions,
    IntradaySeries, Listing, ListingInfo, ListingOptions, Metadata, RateInformation, Result,
    Symbol, TimeSeries,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Series block of the daily adjusted response.
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Series block of the daily FX response.
pub const FX_SERIES_KEY: &str = "Time Series FX (Daily)";

/// Quote block of the exchange rate response.
pub const EXCHANGE_RATE_KEY: &str = "Realtime Currency Exchange Rate";

/// Series block of the intraday response for `interval`.
#[must_use]
pub fn intraday_series_key(interval: Interval) -> String {
    format!("Time Series ({interval})")
}

/// Placeholder the API uses for unknown dividend dates.
const NONE_DATE: &str = "None";

/// Placeholder the listing uses for a missing delisting date.
const NULL_DATE: &str = "null";

const LISTING_COLUMNS: [&str; 7] = [
    "symbol",
    "name",
    "exchange",
    "assettype",
    "ipodate",
    "delistingdate",
    "status",
];

/// Top level of every JSON response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Meta Data")]
    meta: Option<Value>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl Envelope {
    fn from_body(body: &str) -> Result<Self> {
        let envelope: Self =
            serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))?;
        check_api_message(envelope.error_message.as_deref(), envelope.information.as_deref())?;
        Ok(envelope)
    }

    fn metadata<M: DeserializeOwned>(&mut self) -> Result<M> {
        let meta = self
            .meta
            .take()
            .ok_or_else(|| DataError::MetadataParse("missing Meta Data".to_string()))?;
        serde_json::from_value(meta).map_err(|e| DataError::MetadataParse(e.to_string()))
    }

    fn block(&mut self, key: &str) -> Option<Value> {
        self.rest.remove(key)
    }
}

fn check_api_message(error_message: Option<&str>, information: Option<&str>) -> Result<()> {
    if let Some(msg) = error_message {
        return Err(DataError::Api(msg.to_string()));
    }
    if let Some(msg) = information {
        return Err(DataError::Api(msg.to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct DailyMeta {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "5. Time Zone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct IntradayMeta {
    #[serde(rename = "2. Symbol")]
    symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "4. Interval")]
    interval: String,
    #[serde(rename = "6. Time Zone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct FxMeta {
    #[serde(rename = "2. From Symbol")]
    from: String,
    #[serde(rename = "3. To Symbol")]
    to: String,
    #[serde(rename = "5. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "6. Time Zone")]
    time_zone: String,
}

#[derive(Debug, Deserialize)]
struct RateJson {
    #[serde(rename = "1. From_Currency Code")]
    from: String,
    #[serde(rename = "2. From_Currency Name")]
    from_name: String,
    #[serde(rename = "3. To_Currency Code")]
    to: String,
    #[serde(rename = "4. To_Currency Name")]
    to_name: String,
    #[serde(rename = "6. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "7. Time Zone")]
    time_zone: String,
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DividendsJson {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(alias = "Symbol")]
    symbol: Option<String>,
    #[serde(alias = "Data")]
    data: Option<Vec<DividendJson>>,
}

#[derive(Debug, Deserialize)]
struct DividendJson {
    ex_dividend_date: String,
    declaration_date: String,
    record_date: String,
    payment_date: String,
    amount: String,
}

/// Last refresh is a date for daily data and may carry a time otherwise.
fn parse_refresh(s: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(s).or_else(|_| parse_date_utc(s))
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

fn metadata_err(e: DataError) -> DataError {
    DataError::MetadataParse(e.to_string())
}

fn series_err(e: DataError) -> DataError {
    DataError::TimeSeriesParse(e.to_string())
}

/// Builds the elements of a series block, extracting `information` from each.
fn elements<T: InformationTag>(
    block: Option<Value>,
    information: &[T],
    parse_key: fn(&str) -> Result<DateTime<Utc>>,
) -> Result<Vec<Element<T>>> {
    let block = block
        .ok_or_else(|| DataError::TimeSeriesParse("no data available to be parsed".to_string()))?;
    let entries: BTreeMap<String, BTreeMap<String, Value>> =
        serde_json::from_value(block).map_err(|e| {
            DataError::TimeSeriesParse(format!("provided time series is of the wrong type: {e}"))
        })?;

    entries
        .into_iter()
        .map(|(key, fields)| -> Result<Element<T>> {
            let mut element = Element::new(parse_key(&key).map_err(series_err)?);
            for tag in information {
                let raw = fields.get(tag.api_field()).ok_or_else(|| {
                    DataError::TimeSeriesParse(format!("missing {tag} for {key}"))
                })?;
                let value = raw.as_str().and_then(parse_number).ok_or_else(|| {
                    DataError::TimeSeriesParse(format!("error parsing {raw} ({tag}) for {key}"))
                })?;
                element.data.insert(*tag, value);
            }
            Ok(element)
        })
        .collect()
}

/// Parses a `TIME_SERIES_DAILY_ADJUSTED` response.
pub fn daily(body: &str, options: &DailyOptions) -> Result<DailySeries> {
    let mut envelope = Envelope::from_body(body)?;
    let meta: DailyMeta = envelope.metadata()?;
    let last_refresh = parse_refresh(&meta.last_refreshed).map_err(metadata_err)?;

    let metadata = Metadata::new(
        options.information.clone(),
        Instrument::Equity(Symbol::new(meta.symbol)),
        last_refresh,
        meta.time_zone,
    );
    let elements = elements(
        envelope.block(DAILY_SERIES_KEY),
        &options.information,
        parse_date_utc,
    )?;
    Ok(TimeSeries::new(metadata, elements))
}

/// Parses a `TIME_SERIES_INTRADAY` response.
pub fn intraday(body: &str, options: &IntradayOptions) -> Result<IntradaySeries> {
    let mut envelope = Envelope::from_body(body)?;
    let meta: IntradayMeta = envelope.metadata()?;
    let last_refresh = parse_refresh(&meta.last_refreshed).map_err(metadata_err)?;
    let interval: Interval = meta.interval.parse().map_err(metadata_err)?;

    let mut metadata = Metadata::new(
        options.information.clone(),
        Instrument::Equity(Symbol::new(meta.symbol)),
        last_refresh,
        meta.time_zone,
    );
    metadata.interval = Some(interval);

    let elements = elements(
        envelope.block(&intraday_series_key(options.interval)),
        &options.information,
        parse_timestamp,
    )?;
    Ok(TimeSeries::new(metadata, elements))
}

/// Parses an `FX_DAILY` response.
pub fn fx_daily(body: &str, options: &FxOptions) -> Result<FxSeries> {
    let mut envelope = Envelope::from_body(body)?;
    let meta: FxMeta = envelope.metadata()?;
    let last_refresh = parse_refresh(&meta.last_refreshed).map_err(metadata_err)?;

    let metadata = Metadata::new(
        options.information.clone(),
        Instrument::CurrencyPair {
            from: CurrencyCode::new(meta.from),
            to: CurrencyCode::new(meta.to),
        },
        last_refresh,
        meta.time_zone,
    );
    let elements = elements(
        envelope.block(FX_SERIES_KEY),
        &options.information,
        parse_date_utc,
    )?;
    Ok(TimeSeries::new(metadata, elements))
}

/// Parses a `CURRENCY_EXCHANGE_RATE` response.
pub fn exchange_rate(body: &str) -> Result<ExchangeRate> {
    let mut envelope = Envelope::from_body(body)?;
    let block = envelope
        .block(EXCHANGE_RATE_KEY)
        .ok_or_else(|| DataError::Parse(format!("missing {EXCHANGE_RATE_KEY}")))?;
    let quote: RateJson =
        serde_json::from_value(block).map_err(|e| DataError::Parse(e.to_string()))?;

    let last_refresh = parse_refresh(&quote.last_refreshed)?;

    let mut data = BTreeMap::new();
    for tag in RateInformation::ALL {
        let value = quote
            .values
            .get(tag.api_field())
            .and_then(Value::as_str)
            .and_then(parse_number)
            .ok_or_else(|| DataError::Parse(format!("unable to parse {tag} from quote")))?;
        data.insert(*tag, value);
    }

    Ok(ExchangeRate {
        from_currency: CurrencyCode::new(quote.from),
        from_name: quote.from_name,
        to_currency: CurrencyCode::new(quote.to),
        to_name: quote.to_name,
        last_refresh,
        time_zone: quote.time_zone,
        data,
    })
}

fn dividend_date(s: &str) -> Result<Option<NaiveDate>> {
    if s.trim() == NONE_DATE {
        return Ok(None);
    }
    parse_date(s).map(Some).map_err(series_err)
}

/// Parses a `DIVIDENDS` response.
pub fn dividends(body: &str) -> Result<DividendHistory> {
    let parsed: DividendsJson =
        serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))?;
    check_api_message(parsed.error_message.as_deref(), parsed.information.as_deref())?;

    let symbol = parsed
        .symbol
        .ok_or_else(|| DataError::Api("expected symbol, got nothing".to_string()))?;
    let data = parsed
        .data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| DataError::Api("expected data, got empty list".to_string()))?;

    let elements = data
        .into_iter()
        .map(|d| -> Result<Dividend> {
            let amount = parse_number(&d.amount).ok_or_else(|| {
                DataError::TimeSeriesParse(format!("error parsing amount {}", d.amount))
            })?;
            Ok(Dividend {
                ex_dividend_date: dividend_date(&d.ex_dividend_date)?,
                declaration_date: dividend_date(&d.declaration_date)?,
                record_date: dividend_date(&d.record_date)?,
                payment_date: dividend_date(&d.payment_date)?,
                amount,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DividendHistory::new(Symbol::new(symbol), elements))
}

/// Parses a `LISTING_STATUS` CSV response, keeping active rows that pass
/// `options`.
///
/// Header names are matched case-insensitively. Rows with the wrong number
/// of fields are skipped.
pub fn listing(body: &str, options: &ListingOptions) -> Result<Listing> {
    if body.trim_start().starts_with('{') {
        // The listing is CSV, but errors come back as JSON.
        Envelope::from_body(body)?;
        return Err(DataError::Parse("expected CSV listing, got JSON".to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| DataError::Parse(format!("error reading header: {e}")))?
        .clone();
    let lowered: Vec<String> = header.iter().map(str::to_lowercase).collect();
    let mut index = [0usize; LISTING_COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(LISTING_COLUMNS) {
        *slot = lowered
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DataError::Parse(format!("listing header is missing {column}")))?;
    }
    let [symbol, name, exchange, asset_type, ipo, delisting, status] = index;

    let mut tradeables = BTreeMap::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 1;
        let record = record.map_err(|e| DataError::Parse(format!("line {line}: {e}")))?;
        if record.len() != header.len() {
            continue;
        }
        if &record[status] != "Active" {
            continue;
        }

        let ipo_date = parse_date(&record[ipo]).map_err(|e| {
            DataError::Parse(format!("line {line}: ipoDate error parsing '{}': {e}", &record[ipo]))
        })?;
        let delisting_date = match &record[delisting] {
            NULL_DATE => None,
            raw => Some(parse_date(raw).map_err(|e| {
                DataError::Parse(format!("line {line}: delistingDate error parsing '{raw}': {e}"))
            })?),
        };
        let kind = record[asset_type].parse::<AssetType>().map_err(|e| {
            DataError::Parse(format!(
                "line {line}: assetType error parsing '{}': {e}",
                &record[asset_type]
            ))
        })?;
        let exchange_name = record[exchange].to_uppercase();

        if !options.admits(&exchange_name, kind) {
            continue;
        }

        let info = ListingInfo {
            symbol: Symbol::new(&record[symbol]),
            name: record[name].to_string(),
            exchange: exchange_name,
            asset_type: kind,
            ipo_date,
            delisting_date,
        };
        tradeables.insert(info.symbol.clone(), info);
    }

    Ok(Listing {
        options: options.clone(),
        tradeables,
    })
}
