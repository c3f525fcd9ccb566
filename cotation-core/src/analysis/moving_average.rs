//! Moving average stage: short and long min-periods-1 rolling means of close.

use crate::domain::{Column, Series};
use crate::indicators::rolling_mean;

/// Add `ma_short` and `ma_long` to the series.
///
/// No ordering between the two windows is enforced; a zero window is read
/// as one. An empty series is returned unchanged.
pub fn add_moving_averages(series: Series, short_window: usize, long_window: usize) -> Series {
    if series.is_empty() {
        return series;
    }

    let closes = series.closes();
    let ma_short = rolling_mean(&closes, short_window);
    let ma_long = rolling_mean(&closes, long_window);

    tracing::debug!(
        symbol = %series.symbol,
        rows = closes.len(),
        short_window,
        long_window,
        "moving averages computed"
    );

    series
        .with_dense_column(Column::MaShort, ma_short)
        .with_dense_column(Column::MaLong, ma_long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_quotes, DEFAULT_EPSILON};

    #[test]
    fn first_row_equals_first_close() {
        let series = Series::new("TEST", make_quotes(&[42.0, 44.0, 46.0]));
        let series = add_moving_averages(series, 7, 20);
        assert_eq!(series.value(Column::MaShort, 0), Some(42.0));
        assert_eq!(series.value(Column::MaLong, 0), Some(42.0));
    }

    #[test]
    fn short_and_long_windows_differ() {
        let series = Series::new("TEST", make_quotes(&[1.0, 2.0, 3.0, 4.0]));
        let series = add_moving_averages(series, 2, 4);
        assert_approx(series.value(Column::MaShort, 3).unwrap(), 3.5, DEFAULT_EPSILON);
        assert_approx(series.value(Column::MaLong, 3).unwrap(), 2.5, DEFAULT_EPSILON);
    }

    #[test]
    fn short_window_may_exceed_long_window() {
        let series = Series::new("TEST", make_quotes(&[1.0, 2.0, 3.0, 4.0]));
        let series = add_moving_averages(series, 4, 2);
        assert_approx(series.value(Column::MaShort, 3).unwrap(), 2.5, DEFAULT_EPSILON);
        assert_approx(series.value(Column::MaLong, 3).unwrap(), 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_series_is_identity() {
        let series = add_moving_averages(Series::empty("TEST"), 7, 20);
        assert!(series.is_empty());
        assert!(!series.has_column(Column::MaShort));
    }
}
