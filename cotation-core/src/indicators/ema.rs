//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[0] = x[0]. There is no averaging warmup; every row gets a value.

use super::{closes, Indicator};
use crate::domain::Quote;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    /// A zero period is treated as a period of one (alpha = 1).
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, quotes: &[Quote]) -> Vec<f64> {
        ema_of_series(&closes(quotes), span_alpha(self.period))
    }
}

/// Smoothing factor for a span-style period: 2 / (period + 1).
pub fn span_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// EMA of an arbitrary series with an explicit smoothing factor.
///
/// Non-finite inputs are not skipped: a NaN propagates to every later row,
/// matching the garbage-in policy of the engine.
pub fn ema_of_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    let Some(&seed) = iter.next() else {
        return result;
    };
    result.push(seed);

    let mut prev = seed;
    for &x in iter {
        let ema = alpha * x + (1.0 - alpha) * prev;
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_quotes, DEFAULT_EPSILON};

    #[test]
    fn seeds_at_first_value() {
        let result = ema_of_series(&[10.0, 11.0, 12.0], 0.5);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        // 0.5*11 + 0.5*10 = 10.5
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        // 0.5*12 + 0.5*10.5 = 11.25
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
    }

    #[test]
    fn span_alpha_matches_formula() {
        assert_approx(span_alpha(12), 2.0 / 13.0, DEFAULT_EPSILON);
        assert_approx(span_alpha(9), 0.2, DEFAULT_EPSILON);
        assert_approx(span_alpha(1), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn period_one_equals_input() {
        let bars = make_quotes(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_propagates_forward() {
        let result = ema_of_series(&[10.0, f64::NAN, 12.0], 0.5);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(ema_of_series(&[], 0.5).is_empty());
    }

    #[test]
    fn indicator_name_includes_period() {
        assert_eq!(Ema::new(26).name(), "ema_26");
    }
}
