//! Oscillator stage: MACD(12, 26, 9) and RSI(14) from close.

use crate::domain::{Column, Series};
use crate::indicators::{macd, rsi, MACD_FAST, MACD_SIGNAL, MACD_SLOW, RSI_LENGTH};

/// Add `macd_line`, `macd_signal`, `macd_hist` and `rsi`.
///
/// Parameters are fixed. Every row gets a value since all recurrences seed at
/// row 0. An empty series is returned unchanged.
pub fn add_oscillators(series: Series) -> Series {
    if series.is_empty() {
        return series;
    }

    let closes = series.closes();
    let m = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let rsi_values = rsi(&closes, RSI_LENGTH);

    tracing::debug!(symbol = %series.symbol, rows = closes.len(), "oscillators computed");

    series
        .with_dense_column(Column::MacdLine, m.line)
        .with_dense_column(Column::MacdSignal, m.signal)
        .with_dense_column(Column::MacdHist, m.hist)
        .with_dense_column(Column::Rsi, rsi_values)
}
