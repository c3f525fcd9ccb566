//! Pivot stage: support/resistance levels, forward-filled.

use crate::domain::{Column, Series};
use crate::indicators::{detect_pivots, forward_fill, PivotKind};

/// Add `support` (from lows) and `resistance` (from highs).
///
/// Each level holds the most recent pivot value at or before the row and is
/// unset until the first pivot. The two columns propagate independently.
/// An empty series is returned unchanged.
pub fn add_pivot_levels(series: Series, window_size: usize) -> Series {
    if series.is_empty() {
        return series;
    }

    let support_marks = detect_pivots(&series.lows(), window_size, PivotKind::Support);
    let resistance_marks = detect_pivots(&series.highs(), window_size, PivotKind::Resistance);

    tracing::debug!(
        symbol = %series.symbol,
        window_size,
        supports = support_marks.iter().flatten().count(),
        resistances = resistance_marks.iter().flatten().count(),
        "pivots detected"
    );

    series
        .with_column(Column::Support, forward_fill(&support_marks))
        .with_column(Column::Resistance, forward_fill(&resistance_marks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quote;
    use chrono::{Duration, TimeZone, Utc};

    fn quotes_from_lows_highs(lows: &[f64], highs: &[f64]) -> Vec<Quote> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        lows.iter()
            .zip(highs)
            .enumerate()
            .map(|(i, (&low, &high))| Quote {
                time: base + Duration::hours(i as i64),
                open: (low + high) / 2.0,
                high,
                low,
                close: (low + high) / 2.0,
                volume: 1.0,
            })
            .collect()
    }

    #[test]
    fn support_is_forward_filled_from_pivot_rows() {
        let lows = [5.0, 3.0, 5.0, 2.0, 5.0];
        let highs = [9.0, 9.0, 9.0, 9.0, 9.0];
        let series = Series::new("TEST", quotes_from_lows_highs(&lows, &highs));
        let series = add_pivot_levels(series, 1);

        let support = series.column(Column::Support).unwrap();
        assert_eq!(support, &[None, Some(3.0), Some(3.0), Some(2.0), Some(2.0)]);
    }

    #[test]
    fn resistance_propagates_independently() {
        let lows = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let highs = [2.0, 2.5, 7.0, 2.0, 2.0, 2.0];
        let series = Series::new("TEST", quotes_from_lows_highs(&lows, &highs));
        let series = add_pivot_levels(series, 2);

        let resistance = series.column(Column::Resistance).unwrap();
        assert_eq!(resistance, &[None, None, Some(7.0), Some(7.0), Some(7.0), Some(7.0)]);
        // Flat lows: rows 2 and 3 tie against a full window.
        let support = series.column(Column::Support).unwrap();
        assert_eq!(support, &[None, None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn no_pivots_when_window_too_large() {
        let series = Series::new("TEST", quotes_from_lows_highs(&[3.0, 1.0, 3.0], &[4.0, 6.0, 4.0]));
        let series = add_pivot_levels(series, 30);
        assert!(series.column(Column::Support).unwrap().iter().all(Option::is_none));
        assert!(series.column(Column::Resistance).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn empty_series_is_identity() {
        let series = add_pivot_levels(Series::empty("TEST"), 10);
        assert!(!series.has_column(Column::Support));
    }
}
