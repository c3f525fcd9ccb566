//! Cotation report — presentation adapters over the analysis engine.
//!
//! This crate builds on `cotation-core` to provide:
//! - Chart payloads (price, levels, oscillators) as JSON
//! - Email report model: subject line and HTML body with inline chart slots
//! - CSV / JSON export and dataset fingerprinting
//! - Series loading with file → provider → synthetic fallback
//! - Parallel multi-symbol report batches

pub mod batch;
pub mod chart;
pub mod email;
pub mod export;
pub mod loader;

pub use batch::{run_reports, BatchOutcome, HorizonReport, ReportError, SymbolReport};
pub use chart::{ChartPayload, RsiBands};
pub use email::{build_report_html, subject_line, ReportSection, ReportStats};
pub use export::{dataset_hash, export_analysis_json, export_series_csv};
pub use loader::{load_series, LoadError, LoadOptions, LoadedSeries, SeriesRequest};
