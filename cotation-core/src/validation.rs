//! Opt-in input guard.
//!
//! The analysis stages trust their input: unsorted timestamps, NaN prices or
//! inverted candles silently turn into meaningless indicator values. These
//! checks surface such input explicitly, for tests and for callers that would
//! rather reject a series than chart it.

use crate::domain::{Quote, Series};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("row {index}: time goes backwards")]
    NonMonotonicTime { index: usize },

    #[error("row {index}: duplicate time")]
    DuplicateTime { index: usize },

    #[error("row {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("row {index}: OHLC values are inconsistent (low {low}, high {high})")]
    InconsistentOhlc { index: usize, low: f64, high: f64 },

    #[error("row {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },
}

impl ValidationError {
    pub fn index(&self) -> usize {
        match self {
            ValidationError::NonMonotonicTime { index }
            | ValidationError::DuplicateTime { index }
            | ValidationError::NonFinite { index, .. }
            | ValidationError::InconsistentOhlc { index, .. }
            | ValidationError::NegativeVolume { index, .. } => *index,
        }
    }
}

fn check_quote(index: usize, quote: &Quote, out: &mut Vec<ValidationError>) {
    let fields = [
        ("open", quote.open),
        ("high", quote.high),
        ("low", quote.low),
        ("close", quote.close),
        ("volume", quote.volume),
    ];
    let mut finite = true;
    for (field, value) in fields {
        if !value.is_finite() {
            out.push(ValidationError::NonFinite { index, field });
            finite = false;
        }
    }
    if !finite {
        return;
    }

    let ordered = quote.low <= quote.open
        && quote.low <= quote.close
        && quote.high >= quote.open
        && quote.high >= quote.close
        && quote.high >= quote.low;
    if !ordered {
        out.push(ValidationError::InconsistentOhlc {
            index,
            low: quote.low,
            high: quote.high,
        });
    }

    if quote.volume < 0.0 {
        out.push(ValidationError::NegativeVolume {
            index,
            volume: quote.volume,
        });
    }
}

/// Every violation in the series, in row order.
pub fn validation_report(series: &Series) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let quotes = series.quotes();

    for (i, quote) in quotes.iter().enumerate() {
        if i > 0 {
            let prev = quotes[i - 1].time;
            if quote.time == prev {
                errors.push(ValidationError::DuplicateTime { index: i });
            } else if quote.time < prev {
                errors.push(ValidationError::NonMonotonicTime { index: i });
            }
        }
        check_quote(i, quote, &mut errors);
    }

    errors
}

/// First violation in the series, if any. An empty series is valid.
pub fn validate_series(series: &Series) -> Result<(), ValidationError> {
    match validation_report(series).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
