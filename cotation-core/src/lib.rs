//! Cotation core: quote series and the indicator engine.
//!
//! - Domain types (quotes, series, candle intervals, horizons)
//! - Slice-level indicator kernels (rolling mean, EMA, MACD, RSI, pivots)
//! - The four analysis stages and the `analyze` pipeline
//! - Opt-in input guard
//! - TOML settings
//! - Ingestion adapters (Binance klines, CSV/Parquet files, synthetic walk)

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod validation;

pub use analysis::{analyze, Analysis, AnalysisError, Summary};
pub use config::{AnalysisConfig, Settings};
pub use domain::{Column, Horizon, Interval, Quote, Series};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across the report worker pool are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Quote>();
        require_sync::<domain::Quote>();
        require_send::<domain::Series>();
        require_sync::<domain::Series>();
        require_send::<analysis::Analysis>();
        require_sync::<analysis::Analysis>();
        require_send::<config::Settings>();
        require_sync::<config::Settings>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::BinanceProvider>();
        require_sync::<data::BinanceProvider>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
    }

    #[test]
    fn provider_trait_is_object_safe() {
        fn _check(provider: &dyn data::QuoteProvider) -> bool {
            provider.is_available()
        }
    }
}
