//! Chart payload: everything a front-end needs to draw the price panel
//! (candles, moving averages, support/resistance lines) and the oscillator
//! panel (RSI with guide bands, MACD).

use crate::export::dataset_hash;
use cotation_core::analysis::{Analysis, Summary};
use cotation_core::domain::{Column, Horizon, Interval, Series};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Time label format on the x axis.
pub const X_LABEL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Horizontal RSI guide lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiBands {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiBands {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub symbol: String,
    pub horizon: Horizon,
    pub interval: Interval,
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    /// Enrichment columns by name; `null` where unset.
    pub indicators: BTreeMap<Column, Vec<Option<f64>>>,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub rsi_bands: RsiBands,
    pub summary: Option<Summary>,
    pub dataset_hash: String,
}

impl ChartPayload {
    pub fn build(analysis: &Analysis, horizon: Horizon) -> Self {
        let series = &analysis.series;
        let quotes = series.quotes();

        let indicators = series
            .column_names()
            .into_iter()
            .filter_map(|c| series.column(c).map(|values| (c, values.to_vec())))
            .collect();

        Self {
            symbol: series.symbol.clone(),
            horizon,
            interval: horizon.interval(),
            x: quotes
                .iter()
                .map(|q| q.time.format(X_LABEL_FORMAT).to_string())
                .collect(),
            open: quotes.iter().map(|q| q.open).collect(),
            high: series.highs(),
            low: series.lows(),
            close: series.closes(),
            volume: quotes.iter().map(|q| q.volume).collect(),
            indicators,
            support_levels: distinct_levels(series, Column::Support),
            resistance_levels: distinct_levels(series, Column::Resistance),
            rsi_bands: RsiBands::default(),
            summary: analysis.summary,
            dataset_hash: dataset_hash(series),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Distinct set values of a level column, in first-seen order.
fn distinct_levels(series: &Series, column: Column) -> Vec<f64> {
    let Some(values) = series.column(column) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    values
        .iter()
        .flatten()
        .copied()
        .filter(|v| seen.insert(v.to_bits()))
        .collect()
}
