//! Series resolution with fallback.
//!
//! 1. An explicit quote file (CSV, or Parquet by extension) → use it
//! 2. Otherwise, unless offline, ask the provider for the horizon's range
//! 3. If nothing came back and `synthetic` is set → generate a tagged random walk
//! 4. Otherwise → fail with the reason
//!
//! A provider error never escapes directly: it is logged and becomes either a
//! fallback or the `FetchFailed` reason.

use chrono::{DateTime, Utc};
use cotation_core::data::{
    load_quote_file, synthetic_series, DataError, DataSource, QuoteProvider,
};
use cotation_core::domain::{Horizon, Series};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read quote file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: DataError,
    },

    #[error("no data for '{symbol}' while offline (use --synthetic for synthetic data)")]
    NoDataOffline { symbol: String },

    #[error("no data for '{symbol}': {reason}")]
    FetchFailed { symbol: String, reason: String },
}

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    pub horizon: Horizon,
}

impl SeriesRequest {
    pub fn new(symbol: impl Into<String>, horizon: Horizon) -> Self {
        Self {
            symbol: symbol.into(),
            horizon,
        }
    }
}

/// How to load it.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Quote file to read instead of the network.
    pub file: Option<PathBuf>,
    /// Never make network requests.
    pub offline: bool,
    /// Generate synthetic quotes when real data is unavailable.
    pub synthetic: bool,
    /// End of the requested range.
    pub now: DateTime<Utc>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            file: None,
            offline: false,
            synthetic: false,
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: Series,
    pub source: DataSource,
}

impl LoadedSeries {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

fn load_file(path: &Path, symbol: &str) -> Result<LoadedSeries, LoadError> {
    let (series, source) = load_quote_file(path, symbol).map_err(|source| LoadError::File {
        path: path.display().to_string(),
        source,
    })?;
    Ok(LoadedSeries { series, source })
}

/// Candle count covering the horizon's look-back.
fn synthetic_len(horizon: Horizon) -> usize {
    let step = horizon.interval().duration().num_seconds().max(1);
    (horizon.lookback().num_seconds() / step).max(1) as usize
}

pub fn load_series(
    request: &SeriesRequest,
    provider: Option<&dyn QuoteProvider>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    let symbol = request.symbol.as_str();
    let horizon = request.horizon;

    // Step 1: explicit file
    if let Some(path) = &opts.file {
        return load_file(path, symbol);
    }

    // Step 2: provider
    let start = horizon.start_from(opts.now);
    let mut reason = String::from("no provider configured");
    if !opts.offline {
        match provider {
            Some(prov) if prov.is_available() => {
                match prov.fetch(symbol, horizon.interval(), start) {
                    Ok(series) if !series.is_empty() => {
                        return Ok(LoadedSeries {
                            series,
                            source: DataSource::Binance,
                        });
                    }
                    Ok(_) => reason = format!("{} returned no quotes", prov.name()),
                    Err(e) => {
                        tracing::warn!(symbol, provider = prov.name(), error = %e, "fetch failed");
                        reason = e.to_string();
                    }
                }
            }
            Some(prov) => reason = format!("{} is unavailable (circuit breaker open)", prov.name()),
            None => {}
        }
    }

    // Step 3: synthetic
    if opts.synthetic {
        tracing::warn!(symbol, %horizon, "using synthetic quotes; results are not market data");
        let series = synthetic_series(symbol, horizon.interval(), start, synthetic_len(horizon));
        return Ok(LoadedSeries {
            series,
            source: DataSource::Synthetic,
        });
    }

    // Step 4: fail
    if opts.offline {
        return Err(LoadError::NoDataOffline {
            symbol: symbol.to_string(),
        });
    }
    Err(LoadError::FetchFailed {
        symbol: symbol.to_string(),
        reason,
    })
}
