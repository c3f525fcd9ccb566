//! Analysis stages and the end-to-end pipeline.
//!
//! Each stage takes a [`Series`] by value and returns it with new columns:
//! moving averages → pivot levels → oscillators, then the summary is read off
//! the enriched series. Stages hold no state between calls, so independent
//! series can be analyzed from any number of threads.

pub mod moving_average;
pub mod oscillators;
pub mod pivots;
pub mod summary;

pub use moving_average::add_moving_averages;
pub use oscillators::add_oscillators;
pub use pivots::add_pivot_levels;
pub use summary::{add_summary_stats, round2, Summary};

use crate::config::AnalysisConfig;
use crate::domain::{Column, Series};
use crate::validation::{validate_series, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input series for {symbol}: {source}")]
    InvalidInput {
        symbol: String,
        #[source]
        source: ValidationError,
    },
}

/// Enriched series plus its period summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub series: Series,
    pub summary: Option<Summary>,
}

impl Analysis {
    /// RSI at the last row, if any.
    pub fn last_rsi(&self) -> Option<f64> {
        let last = self.series.len().checked_sub(1)?;
        self.series.value(Column::Rsi, last)
    }
}

/// Run every stage over `series` with the windows from `config`.
///
/// Fails only when `config.validate_input` is set and the series breaks the
/// ordering or OHLC contract; otherwise degenerate input flows through to
/// degenerate indicator values.
pub fn analyze(series: Series, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    if config.validate_input {
        validate_series(&series).map_err(|source| AnalysisError::InvalidInput {
            symbol: series.symbol.clone(),
            source,
        })?;
    }

    let series = add_moving_averages(series, config.short_window, config.long_window);
    let series = add_pivot_levels(series, config.pivot_window);
    let series = add_oscillators(series);
    let summary = add_summary_stats(&series);

    tracing::debug!(symbol = %series.symbol, rows = series.len(), "analysis complete");

    Ok(Analysis { series, summary })
}
