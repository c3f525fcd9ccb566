//! Quote ingestion: exchange client, file loaders, synthetic fallback.

pub mod binance;
pub mod circuit_breaker;
pub mod ingest;
pub mod provider;
pub mod synthetic;

pub use binance::{parse_klines, BinanceProvider};
pub use circuit_breaker::CircuitBreaker;
pub use ingest::{is_parquet_path, load_csv, load_parquet, load_quote_file, QuoteSchema};
pub use provider::{DataError, DataSource, QuoteProvider};
pub use synthetic::synthetic_series;
