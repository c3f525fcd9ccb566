//! File ingestion: CSV and Parquet quote tables via polars.
//!
//! Both formats share one layout, the columns of a Binance kline export:
//! `open_time` (epoch milliseconds), `open`, `high`, `low`, `close`, `volume`.
//! Extra columns are ignored. Row order is kept as-is so the input guard can
//! still see unsorted or duplicated timestamps.

use super::provider::{DataError, DataSource};
use crate::domain::{Quote, Series};
use chrono::DateTime;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

const PRICE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Expected schema for quote files.
pub struct QuoteSchema;

impl QuoteSchema {
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("open_time".into(), DataType::Int64),
            Field::new("open".into(), DataType::Float64),
            Field::new("high".into(), DataType::Float64),
            Field::new("low".into(), DataType::Float64),
            Field::new("close".into(), DataType::Float64),
            Field::new("volume".into(), DataType::Float64),
        ])
    }
}

fn ingest_err(context: &str) -> impl Fn(PolarsError) -> DataError + '_ {
    move |e| DataError::IngestFailed(format!("{context}: {e}"))
}

/// Project and cast to the quote layout. Parquet files written by other tools
/// may store `open_time` as a millisecond datetime, which casts to Int64.
fn project(frame: LazyFrame) -> LazyFrame {
    let mut exprs = vec![col("open_time").cast(DataType::Int64)];
    exprs.extend(PRICE_COLUMNS.iter().map(|c| col(*c).cast(DataType::Float64)));
    frame.select(exprs)
}

/// Load a CSV file with a header row.
pub fn load_csv(path: &Path, symbol: &str) -> Result<Series, DataError> {
    let frame = LazyCsvReader::new(path)
        .with_schema(Some(Arc::new(QuoteSchema::schema())))
        .with_has_header(true)
        .finish()
        .map_err(ingest_err("csv scan"))?;
    let df = project(frame).collect().map_err(ingest_err("csv read"))?;
    let series = dataframe_to_series(&df, symbol)?;
    tracing::debug!(path = %path.display(), symbol, rows = series.len(), "csv loaded");
    Ok(series)
}

/// Load a Parquet file.
pub fn load_parquet(path: &Path, symbol: &str) -> Result<Series, DataError> {
    let frame = LazyFrame::scan_parquet(path, Default::default())
        .map_err(ingest_err("parquet scan"))?;
    let df = project(frame).collect().map_err(ingest_err("parquet read"))?;
    let series = dataframe_to_series(&df, symbol)?;
    tracing::debug!(path = %path.display(), symbol, rows = series.len(), "parquet loaded");
    Ok(series)
}

/// True when the file extension is `.parquet` (any case).
pub fn is_parquet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"))
}

/// Load a quote file, choosing Parquet or CSV by extension.
pub fn load_quote_file(path: &Path, symbol: &str) -> Result<(Series, DataSource), DataError> {
    if is_parquet_path(path) {
        Ok((load_parquet(path, symbol)?, DataSource::ParquetImport))
    } else {
        Ok((load_csv(path, symbol)?, DataSource::CsvImport))
    }
}

fn f64_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, DataError> {
    df.column(name)
        .map_err(ingest_err(name))?
        .f64()
        .map_err(ingest_err(name))
}

fn dataframe_to_series(df: &DataFrame, symbol: &str) -> Result<Series, DataError> {
    let times = df
        .column("open_time")
        .map_err(ingest_err("open_time column"))?
        .i64()
        .map_err(ingest_err("open_time column type"))?;

    let open = f64_column(df, "open")?;
    let high = f64_column(df, "high")?;
    let low = f64_column(df, "low")?;
    let close = f64_column(df, "close")?;
    let volume = f64_column(df, "volume")?;

    let field = |ca: &Float64Chunked, name: &str, row: usize| {
        ca.get(row)
            .ok_or_else(|| DataError::IngestFailed(format!("null {name} at row {row}")))
    };

    let mut quotes = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let ms = times
            .get(row)
            .ok_or_else(|| DataError::IngestFailed(format!("null open_time at row {row}")))?;
        let time = DateTime::from_timestamp_millis(ms).ok_or_else(|| {
            DataError::IngestFailed(format!("open_time {ms} out of range at row {row}"))
        })?;
        quotes.push(Quote {
            time,
            open: field(open, "open", row)?,
            high: field(high, "high", row)?,
            low: field(low, "low", row)?,
            close: field(close, "close", row)?,
            volume: field(volume, "volume", row)?,
        });
    }

    Ok(Series::new(symbol, quotes))
}
