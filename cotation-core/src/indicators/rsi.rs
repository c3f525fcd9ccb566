//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! diff[0] = 0, diff[t] = close[t] - close[t-1]
//! avg_gain / avg_loss = EMA with alpha = 1/length, seeded at row 0
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! Edge case: avg_loss == 0 substitutes rs = 0, so a run with no losses
//! (including a flat series) reads 0, not the textbook 100.

use super::ema::ema_of_series;
use super::{closes, Indicator};
use crate::domain::Quote;

pub const RSI_LENGTH: usize = 14;

#[derive(Debug, Clone)]
pub struct Rsi {
    length: usize,
    name: String,
}

impl Rsi {
    pub fn new(length: usize) -> Self {
        let length = length.max(1);
        Self {
            length,
            name: format!("rsi_{length}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, quotes: &[Quote]) -> Vec<f64> {
        rsi(&closes(quotes), self.length)
    }
}

pub fn rsi(closes: &[f64], length: usize) -> Vec<f64> {
    let n = closes.len();
    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);

    for i in 0..n {
        let diff = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(if diff > 0.0 { diff } else { 0.0 });
        losses.push(if diff < 0.0 { -diff } else { 0.0 });
    }

    let alpha = 1.0 / length.max(1) as f64;
    let avg_gain = ema_of_series(&gains, alpha);
    let avg_loss = ema_of_series(&losses, alpha);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| compute_rsi(g, l))
        .collect()
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 { 0.0 } else { avg_gain / avg_loss };
    100.0 - 100.0 / (1.0 + rs)
}
