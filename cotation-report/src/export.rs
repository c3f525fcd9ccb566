//! Export: enriched series as CSV, analyses as JSON, dataset fingerprint.

use anyhow::{Context, Result};
use cotation_core::analysis::Analysis;
use cotation_core::domain::Series;

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per quote: time, OHLCV, then every enrichment column present on
/// the series. Unset values are written as empty fields.
pub fn export_series_csv(series: &Series) -> Result<String> {
    let columns = series.column_names();
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["time", "open", "high", "low", "close", "volume"];
    header.extend(columns.iter().map(|c| c.name()));
    wtr.write_record(&header)?;

    for (i, q) in series.quotes().iter().enumerate() {
        let mut record = vec![
            q.time.to_rfc3339(),
            q.open.to_string(),
            q.high.to_string(),
            q.low.to_string(),
            q.close.to_string(),
            q.volume.to_string(),
        ];
        for &column in &columns {
            record.push(
                series
                    .value(column, i)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_analysis_json(analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("failed to serialize analysis to JSON")
}

// ─── Fingerprint ────────────────────────────────────────────────────

/// Deterministic BLAKE3 hash over the symbol and every quote.
///
/// Enrichment columns are not hashed: two analyses of the same input with
/// different windows share a dataset hash.
pub fn dataset_hash(series: &Series) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol.as_bytes());
    for q in series.quotes() {
        hasher.update(&q.time.timestamp_millis().to_le_bytes());
        hasher.update(&q.open.to_le_bytes());
        hasher.update(&q.high.to_le_bytes());
        hasher.update(&q.low.to_le_bytes());
        hasher.update(&q.close.to_le_bytes());
        hasher.update(&q.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
