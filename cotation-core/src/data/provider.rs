//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over market data sources so the network
//! client can be swapped for a file or a mock in tests.

use crate::domain::{Interval, Series};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("ingest failed: {0}")]
    IngestFailed(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Binance,
    CsvImport,
    ParquetImport,
    Synthetic,
}

/// Trait for market data providers.
///
/// Implementations return quotes sorted ascending by time with unique
/// timestamps; the analysis stages rely on that and do not re-check it.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch every candle of `interval` for `symbol` from `start` up to now.
    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        start: DateTime<Utc>,
    ) -> Result<Series, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
