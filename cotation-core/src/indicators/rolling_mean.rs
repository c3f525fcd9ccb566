//! Rolling mean with a minimum of one period.
//!
//! out[i] = mean(values[max(0, i-window+1)..=i])
//! The window shrinks at the head of the series instead of leaving rows
//! unset, so out[0] == values[0].

use super::{closes, Indicator};
use crate::domain::Quote;

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    name: String,
}

impl RollingMean {
    /// A zero window is treated as a window of one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            name: format!("ma_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, quotes: &[Quote]) -> Vec<f64> {
        rolling_mean(&closes(quotes), self.window)
    }
}

/// Min-periods-1 rolling mean over `values`.
///
/// Each row sums its own window, so a NaN/inf only affects the rows whose
/// window contains it and rounding error never carries into later rows.
/// Cost is O(n * window); the configured windows are short.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_quotes, DEFAULT_EPSILON};

    #[test]
    fn head_rows_use_shrinking_window() {
        let result = rolling_mean(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5);
        assert_eq!(result.len(), 7);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 11.5, DEFAULT_EPSILON);
        // Full window from here on
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn window_of_one_is_identity() {
        let values = [100.0, 200.0, 300.0];
        assert_eq!(rolling_mean(&values, 1), values.to_vec());
    }

    #[test]
    fn zero_window_behaves_like_one() {
        let values = [3.0, 5.0];
        assert_eq!(rolling_mean(&values, 0), values.to_vec());
    }

    #[test]
    fn window_longer_than_series_is_cumulative_mean() {
        let result = rolling_mean(&[2.0, 4.0, 6.0], 50);
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_only_poisons_rows_whose_window_contains_it() {
        let result = rolling_mean(&[10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0], 3);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert_approx(result[5], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn large_value_leaving_window_does_not_skew_later_rows() {
        let result = rolling_mean(&[1e16, 1.0, 1.0, 1.0], 2);
        assert_eq!(result[0], 1e16);
        assert_eq!(result[2], 1.0);
        assert_eq!(result[3], 1.0);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(rolling_mean(&[], 5).is_empty());
    }

    #[test]
    fn indicator_reads_closes() {
        let ma = RollingMean::new(2);
        assert_eq!(ma.name(), "ma_2");
        let result = ma.compute(&make_quotes(&[1.0, 3.0, 5.0]));
        assert_eq!(result, vec![1.0, 2.0, 4.0]);
    }
}
