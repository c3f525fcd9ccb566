//! Period summary: first open, last close, absolute and percent change.

use crate::domain::Series;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Open/close/diff/percent over a whole series, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub open: f64,
    pub close: f64,
    pub diff: f64,
    pub percent: f64,
}

/// Round to 2 decimals on the exact decimal value of `value`, ties to even.
///
/// 2.675 is stored as 2.67499.. and rounds to 2.67; an exact tie such as
/// 0.125 rounds to 0.12. Non-finite values come back unchanged.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Summarize the series. `None` for an empty series.
///
/// `percent` is computed from the unrounded diff and is 0 when the first open
/// is exactly 0.
pub fn add_summary_stats(series: &Series) -> Option<Summary> {
    let open = series.first()?.open;
    let close = series.last()?.close;
    let diff = close - open;
    let percent = if open != 0.0 {
        round2(diff / open * 100.0)
    } else {
        0.0
    };

    Some(Summary {
        open: round2(open),
        close: round2(close),
        diff: round2(diff),
        percent,
    })
}
