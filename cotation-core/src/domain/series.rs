//! Series: an ordered run of quotes plus the enrichment columns derived from it.
//!
//! Position order is time order. The series never sorts or deduplicates its
//! quotes; that is the ingestion adapter's contract. Analysis stages add
//! columns and leave the quotes and any other column untouched.

use super::quote::Quote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Enrichment columns an analysis stage can attach to a [`Series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    MaShort,
    MaLong,
    Support,
    Resistance,
    MacdLine,
    MacdSignal,
    MacdHist,
    Rsi,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::MaShort,
        Column::MaLong,
        Column::Support,
        Column::Resistance,
        Column::MacdLine,
        Column::MacdSignal,
        Column::MacdHist,
        Column::Rsi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::MaShort => "ma_short",
            Column::MaLong => "ma_long",
            Column::Support => "support",
            Column::Resistance => "resistance",
            Column::MacdLine => "macd_line",
            Column::MacdSignal => "macd_signal",
            Column::MacdHist => "macd_hist",
            Column::Rsi => "rsi",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered quotes for one symbol, with nullable enrichment columns.
///
/// Every stored column has exactly `quotes.len()` entries; `None` marks an
/// unset row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    quotes: Vec<Quote>,
    columns: BTreeMap<Column, Vec<Option<f64>>>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, quotes: Vec<Quote>) -> Self {
        Self {
            symbol: symbol.into(),
            quotes,
            columns: BTreeMap::new(),
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn first(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    pub fn last(&self) -> Option<&Quote> {
        self.quotes.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.low).collect()
    }

    /// Attach (or replace) one column. Quotes and other columns are untouched.
    ///
    /// Crate-internal: analysis stages build columns from the series itself.
    ///
    /// # Panics
    /// If `values` does not have one entry per quote.
    pub(crate) fn with_column(mut self, column: Column, values: Vec<Option<f64>>) -> Self {
        assert_eq!(
            values.len(),
            self.quotes.len(),
            "column {column} length mismatch"
        );
        self.columns.insert(column, values);
        self
    }

    /// Convenience for dense columns where every row carries a value.
    pub(crate) fn with_dense_column(self, column: Column, values: Vec<f64>) -> Self {
        self.with_column(column, values.into_iter().map(Some).collect())
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    pub fn column(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(|v| v.as_slice())
    }

    /// Value of `column` at row `index`; `None` when the column is absent,
    /// the index is out of range, or the row is unset.
    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.columns
            .get(&column)
            .and_then(|v| v.get(index).copied().flatten())
    }

    /// Columns attached so far, in declaration order.
    pub fn column_names(&self) -> Vec<Column> {
        self.columns.keys().copied().collect()
    }
}
