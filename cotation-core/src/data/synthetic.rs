//! Synthetic quotes for development and offline demos.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of the symbol so the
//! same symbol always yields the same series. Clearly fake; callers tag it.

use crate::domain::{Interval, Quote, Series};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `n` consecutive candles of `interval` starting at `start`.
pub fn synthetic_series(symbol: &str, interval: Interval, start: DateTime<Utc>, n: usize) -> Series {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let step = interval.duration();
    let mut quotes = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut time = start;

    for _ in 0..n {
        let ret: f64 = rng.gen_range(-0.02..0.02);
        let open = price;
        let close = price * (1.0 + ret);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
        let volume = rng.gen_range(10.0..1_000.0);

        quotes.push(Quote {
            time,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        time += step;
    }

    Series::new(symbol, quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_series;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn deterministic_per_symbol() {
        let a = synthetic_series("BTCUSDC", Interval::OneHour, start(), 50);
        let b = synthetic_series("BTCUSDC", Interval::OneHour, start(), 50);
        let c = synthetic_series("ETHUSDC", Interval::OneHour, start(), 50);
        assert_eq!(a.quotes(), b.quotes());
        assert_ne!(a.closes(), c.closes());
    }

    #[test]
    fn well_formed_candles() {
        let series = synthetic_series("SOLUSDC", Interval::FourHours, start(), 200);
        assert_eq!(series.len(), 200);
        assert!(validate_series(&series).is_ok());
        let q = series.quotes();
        assert_eq!(q[1].time - q[0].time, Interval::FourHours.duration());
        assert_eq!(q[0].open, 100.0);
    }

    #[test]
    fn zero_rows_is_empty() {
        assert!(synthetic_series("X", Interval::OneDay, start(), 0).is_empty());
    }
}
