//! Indicator kernels.
//!
//! Slice-in, vector-out functions shared by the analysis stages. All of them
//! produce one output per input row and never look past the end of the slice.
//! The pivot kernel is the only one that reads forward (a symmetric window);
//! everything else is causal.

pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rolling_mean;
pub mod rsi;

pub use ema::{ema_of_series, span_alpha, Ema};
pub use macd::{macd, MacdSeries, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
pub use pivots::{detect_pivots, forward_fill, PivotKind};
pub use rolling_mean::{rolling_mean, RollingMean};
pub use rsi::{rsi, Rsi, RSI_LENGTH};

use crate::domain::Quote;

/// A named single-series indicator computed from close prices.
///
/// Every row gets a value: the kernels here seed at the first row instead of
/// leaving a warmup gap.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ma_7", "rsi_14").
    fn name(&self) -> &str;

    /// Compute the indicator for the entire quote series.
    ///
    /// Returns a `Vec<f64>` of the same length as `quotes`.
    fn compute(&self, quotes: &[Quote]) -> Vec<f64>;
}

pub(crate) fn closes(quotes: &[Quote]) -> Vec<f64> {
    quotes.iter().map(|q| q.close).collect()
}

/// Create synthetic hourly quotes from close prices for testing.
///
/// open = prev_close (or close for the first quote),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 10.
#[cfg(test)]
pub fn make_quotes(closes: &[f64]) -> Vec<Quote> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Quote {
                time: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 10.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
