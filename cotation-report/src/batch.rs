//! Multi-symbol report batch.
//!
//! Symbols are processed in parallel on the rayon pool. Within a symbol the
//! horizons run in order so sections come out in configured order. One
//! symbol failing (no data, invalid input) is recorded and does not stop the
//! others.

use crate::chart::ChartPayload;
use crate::email::{build_report_html, subject_line, ReportSection, ReportStats};
use crate::loader::{LoadError, LoadedSeries};
use cotation_core::analysis::{analyze, AnalysisError};
use cotation_core::config::AnalysisConfig;
use cotation_core::domain::Horizon;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("no quotes for {symbol} over {horizon}")]
    EmptySeries { symbol: String, horizon: Horizon },
}

/// One horizon of a symbol report.
#[derive(Debug, Clone)]
pub struct HorizonReport {
    pub section: ReportSection,
    pub chart: ChartPayload,
    pub synthetic: bool,
}

/// A finished report for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub symbol: String,
    pub horizons: Vec<HorizonReport>,
    pub subject: String,
    pub html: String,
}

impl SymbolReport {
    pub fn has_synthetic(&self) -> bool {
        self.horizons.iter().any(|h| h.synthetic)
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful reports, in input symbol order.
    pub reports: Vec<SymbolReport>,
    /// Symbols that failed, with the first error hit.
    pub failures: Vec<(String, ReportError)>,
}

fn build_symbol_report<F>(
    symbol: &str,
    horizons: &[Horizon],
    loader: &F,
    config: &AnalysisConfig,
) -> Result<SymbolReport, ReportError>
where
    F: Fn(&str, Horizon) -> Result<LoadedSeries, LoadError> + Sync,
{
    let mut parts = Vec::with_capacity(horizons.len());

    for &horizon in horizons {
        let loaded = loader(symbol, horizon)?;
        let synthetic = loaded.is_synthetic();
        let analysis = analyze(loaded.series, config)?;
        let stats = ReportStats::from_analysis(&analysis).ok_or_else(|| {
            ReportError::EmptySeries {
                symbol: symbol.to_string(),
                horizon,
            }
        })?;

        parts.push(HorizonReport {
            section: ReportSection::new(symbol, horizon, stats),
            chart: ChartPayload::build(&analysis, horizon),
            synthetic,
        });
    }

    let sections: Vec<ReportSection> = parts.iter().map(|p| p.section.clone()).collect();
    Ok(SymbolReport {
        symbol: symbol.to_string(),
        subject: subject_line(symbol, &sections),
        html: build_report_html(symbol, &sections),
        horizons: parts,
    })
}

/// Build a report per symbol covering every horizon.
///
/// `loader` resolves the quotes for one symbol/horizon pair; it is called
/// from worker threads.
pub fn run_reports<F>(
    symbols: &[String],
    horizons: &[Horizon],
    loader: F,
    config: &AnalysisConfig,
) -> BatchOutcome
where
    F: Fn(&str, Horizon) -> Result<LoadedSeries, LoadError> + Sync,
{
    let results: Vec<(String, Result<SymbolReport, ReportError>)> = symbols
        .par_iter()
        .map(|symbol| {
            let result = build_symbol_report(symbol, horizons, &loader, config);
            (symbol.clone(), result)
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (symbol, result) in results {
        match result {
            Ok(report) => {
                tracing::info!(symbol = %symbol, subject = %report.subject, "report built");
                outcome.reports.push(report);
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "report failed");
                outcome.failures.push((symbol, e));
            }
        }
    }
    outcome
}
