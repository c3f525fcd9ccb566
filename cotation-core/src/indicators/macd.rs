//! Moving Average Convergence/Divergence (MACD).
//!
//! line   = EMA(close, fast) - EMA(close, slow)
//! signal = EMA(line, signal)
//! hist   = line - signal
//! All three EMAs use alpha = 2/(period+1) seeded at the first row.

use super::ema::{ema_of_series, span_alpha};

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// The three MACD series, each one entry per input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ema_of_series(closes, span_alpha(fast));
    let ema_slow = ema_of_series(closes, span_alpha(slow));

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_of_series(&line, span_alpha(signal));
    let hist = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| l - s)
        .collect();

    MacdSeries {
        line,
        signal: signal_line,
        hist,
    }
}
