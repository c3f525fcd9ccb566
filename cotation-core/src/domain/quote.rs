//! Quote — one OHLCV candle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candle for a single instrument over one interval.
///
/// `time` is the candle open time. The OHLC ordering (`low <= open, close <= high`)
/// is assumed by the indicator stages, never enforced by them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Quote {
    /// Returns true if any OHLCV field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// OHLC sanity check: finite fields, high >= open/close/low, low <= open/close,
    /// non-negative volume.
    pub fn is_sane(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_quote() -> Quote {
        Quote {
            time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 12.5,
        }
    }

    #[test]
    fn quote_is_sane() {
        assert!(sample_quote().is_sane());
    }

    #[test]
    fn quote_detects_void() {
        let mut q = sample_quote();
        q.close = f64::NAN;
        assert!(q.is_void());
        assert!(!q.is_sane());
    }

    #[test]
    fn quote_detects_inverted_range() {
        let mut q = sample_quote();
        q.high = 97.0;
        assert!(!q.is_sane());
    }

    #[test]
    fn quote_serialization_roundtrip() {
        let q = sample_quote();
        let json = serde_json::to_string(&q).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }
}
