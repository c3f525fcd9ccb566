//! Binance public kline provider.
//!
//! Fetches candles from `GET /api/v3/klines`, paging 1000 rows at a time from
//! the requested start until the exchange returns a short page. Handles rate
//! limiting, retries with exponential backoff and the circuit breaker.
//!
//! Kline rows are arrays:
//!   [0] openTime (ms), [1] open, [2] high, [3] low, [4] close, [5] volume,
//!   [6] closeTime, ... (prices and volume are decimal strings)

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, QuoteProvider};
use crate::domain::{Interval, Quote, Series};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const PAGE_LIMIT: usize = 1000;
const MAX_PAGES: usize = 500;
const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// Binance error code for an unknown trading pair.
const INVALID_SYMBOL_CODE: i64 = -1121;

pub struct BinanceProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl BinanceProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Point the provider at another host (testnet, mirror, local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base delay of the exponential retry backoff.
    pub fn with_retry_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn klines_url(&self, symbol: &str, interval: Interval, start_ms: i64) -> String {
        format!(
            "{}/api/v3/klines?symbol={symbol}&interval={interval}&startTime={start_ms}&limit={PAGE_LIMIT}",
            self.base_url
        )
    }

    /// Fetch one page with retry and circuit breaker logic.
    fn fetch_page(&self, symbol: &str, url: &str) -> Result<Vec<Quote>, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::warn!(symbol, attempt, ?delay, "retrying kline request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if !status.is_success() {
                let text = resp.text().unwrap_or_default();
                let code = serde_json::from_str::<Value>(&text)
                    .ok()
                    .and_then(|body| body.get("code").and_then(Value::as_i64));
                if code == Some(INVALID_SYMBOL_CODE) {
                    return Err(DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    });
                }
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let body: Value = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse kline response for {symbol}: {e}"
                ))
            })?;

            let quotes = parse_klines(&body)?;
            self.circuit_breaker.record_success();
            return Ok(quotes);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl QuoteProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        start: DateTime<Utc>,
    ) -> Result<Series, DataError> {
        let mut quotes: Vec<Quote> = Vec::new();
        let mut start_ms = start.timestamp_millis();

        for _ in 0..MAX_PAGES {
            let url = self.klines_url(symbol, interval, start_ms);
            let page = self.fetch_page(symbol, &url)?;
            let page_len = page.len();

            let Some(last) = page.last() else {
                break;
            };
            let next_start = last.time.timestamp_millis() + 1;

            quotes.extend(page);
            if page_len < PAGE_LIMIT || next_start <= start_ms {
                break;
            }
            start_ms = next_start;
        }

        tracing::debug!(symbol, %interval, count = quotes.len(), "klines fetched");

        if quotes.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(Series::new(symbol, quotes))
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

/// Parse a JSON value that may be either a decimal string or a number.
fn parse_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        other => other.as_f64(),
    }
}

fn parse_row(row: &Value) -> Option<Quote> {
    let arr = row.as_array()?;
    if arr.len() < 6 {
        return None;
    }
    let time = DateTime::from_timestamp_millis(arr[0].as_i64()?)?;
    Some(Quote {
        time,
        open: parse_f64(&arr[1])?,
        high: parse_f64(&arr[2])?,
        low: parse_f64(&arr[3])?,
        close: parse_f64(&arr[4])?,
        volume: parse_f64(&arr[5])?,
    })
}

/// Convert a kline array-of-arrays payload into quotes.
///
/// Malformed rows are skipped with a warning; a payload that is not an array
/// at all is a format error.
pub fn parse_klines(body: &Value) -> Result<Vec<Quote>, DataError> {
    let rows = body
        .as_array()
        .ok_or_else(|| DataError::ResponseFormatChanged("klines response is not an array".into()))?;

    let mut quotes = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        match parse_row(row) {
            Some(q) => quotes.push(q),
            None => tracing::warn!(row = i, "skipping malformed kline entry"),
        }
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Local HTTP server answering every request with the same status and
    /// body. Returns its base URL and a request counter.
    fn serve_fixed(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (url, hits)
    }

    fn stub_provider(url: &str, breaker: Arc<CircuitBreaker>) -> BinanceProvider {
        BinanceProvider::new(breaker)
            .unwrap()
            .with_base_url(url)
            .with_retry_delay(Duration::from_millis(1))
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_704_067_200_000).unwrap()
    }

    #[test]
    fn html_gateway_error_is_retried_and_counted() {
        let (url, hits) = serve_fixed("502 Bad Gateway", "<html><body>Bad Gateway</body></html>");
        let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60), 10));
        let provider = stub_provider(&url, Arc::clone(&breaker));

        let err = provider.fetch("BTCUSDC", Interval::OneHour, start()).unwrap_err();
        assert!(matches!(err, DataError::Other(ref m) if m.contains("502")), "{err}");
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn repeated_gateway_errors_open_the_breaker() {
        let (url, hits) = serve_fixed("502 Bad Gateway", "");
        let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60), 3));
        let provider = stub_provider(&url, Arc::clone(&breaker));

        let err = provider.fetch("BTCUSDC", Interval::OneHour, start()).unwrap_err();
        assert!(matches!(err, DataError::CircuitBreakerTripped), "{err}");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(!breaker.is_allowed());
    }

    #[test]
    fn invalid_symbol_code_in_error_body() {
        let (url, hits) = serve_fixed("400 Bad Request", r#"{"code":-1121,"msg":"Invalid symbol."}"#);
        let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60), 3));
        let provider = stub_provider(&url, Arc::clone(&breaker));

        let err = provider.fetch("NOPE", Interval::OneHour, start()).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "NOPE"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(breaker.is_allowed());
    }

    #[test]
    fn parses_string_prices() {
        let body = json!([
            [1704067200000i64, "42000.5", "42100.0", "41900.0", "42050.25", "12.5", 1704070799999i64],
            [1704070800000i64, "42050.25", "42200.0", "42000.0", "42150.0", "8.0", 1704074399999i64]
        ]);
        let quotes = parse_klines(&body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].open, 42000.5);
        assert_eq!(quotes[0].close, 42050.25);
        assert_eq!(quotes[1].volume, 8.0);
        assert_eq!(quotes[0].time.timestamp_millis(), 1704067200000);
    }

    #[test]
    fn accepts_numeric_prices() {
        let body = json!([[1704067200000i64, 1.0, 2.0, 0.5, 1.5, 100.0]]);
        let quotes = parse_klines(&body).unwrap();
        assert_eq!(quotes[0].high, 2.0);
    }

    #[test]
    fn skips_malformed_rows() {
        let body = json!([
            [1704067200000i64, "1", "2"],
            "garbage",
            [1704070800000i64, "1", "2", "0.5", "not-a-number", "3"],
            [1704074400000i64, "1", "2", "0.5", "1.5", "3"]
        ]);
        let quotes = parse_klines(&body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].close, 1.5);
    }

    #[test]
    fn rejects_non_array_payload() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(matches!(
            parse_klines(&body),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn klines_url_includes_paging_parameters() {
        let provider = BinanceProvider::new(Arc::new(CircuitBreaker::default_provider()))
            .unwrap()
            .with_base_url("http://localhost:9/");
        let url = provider.klines_url("BTCUSDC", Interval::FourHours, 1_700_000_000_000);
        assert_eq!(
            url,
            "http://localhost:9/api/v3/klines?symbol=BTCUSDC&interval=4h&startTime=1700000000000&limit=1000"
        );
    }
}
