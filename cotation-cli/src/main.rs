//! Cotation CLI — analyze, report, and validate commands.
//!
//! Commands:
//! - `analyze` — run the indicator pipeline for one symbol and horizon
//! - `report` — build the multi-horizon email report for each watched symbol
//! - `validate` — check a quote file against the ordering and OHLC contract

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cotation_core::analysis::analyze;
use cotation_core::config::Settings;
use cotation_core::data::{load_quote_file, BinanceProvider, CircuitBreaker, QuoteProvider};
use cotation_core::domain::Horizon;
use cotation_core::validation::validation_report;
use cotation_report::{
    export_analysis_json, export_series_csv, load_series, run_reports, ChartPayload, LoadOptions,
    SeriesRequest,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cotation", about = "Cotation CLI — crypto quote analysis and reports")]
struct Cli {
    /// Settings TOML (analysis windows, watchlist, report horizons).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Open/close/diff/percent and last RSI.
    Summary,
    /// Chart payload JSON.
    Chart,
    /// Enriched series as CSV.
    Csv,
    /// Full analysis JSON.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the indicator pipeline for one symbol.
    Analyze {
        #[arg(long, default_value = "BTCUSDC")]
        symbol: String,

        /// Horizon code: 1d, 1w, 1m, 1y, 5y. Unknown codes fall back to 1m.
        #[arg(long, default_value = "1m")]
        horizon: String,

        /// Read quotes from a CSV (or .parquet) file instead of Binance.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, value_enum, default_value = "summary")]
        format: OutputFormat,
    },
    /// Build email reports (HTML body + chart payloads) for each symbol.
    Report {
        /// Symbols to report on. Defaults to the configured watchlist.
        symbols: Vec<String>,

        /// Output directory for `<symbol>.html` and chart JSON files.
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Check a quote file for ordering, NaN, and OHLC violations.
    Validate {
        /// Quote file, CSV or .parquet.
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, default_value = "UNKNOWN")]
        symbol: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            symbol,
            horizon,
            csv,
            offline,
            synthetic,
            format,
        } => run_analyze(&settings, symbol, &horizon, csv, offline, synthetic, format),
        Commands::Report {
            symbols,
            out_dir,
            offline,
            synthetic,
        } => run_report(&settings, symbols, &out_dir, offline, synthetic),
        Commands::Validate { csv, symbol } => run_validate(&csv, &symbol),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn make_provider(offline: bool) -> Result<Option<BinanceProvider>> {
    if offline {
        return Ok(None);
    }
    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Some(BinanceProvider::new(circuit_breaker)?))
}

fn parse_horizon(code: &str) -> Horizon {
    let horizon = Horizon::parse_or_default(code);
    if horizon.code() != code {
        tracing::warn!(requested = code, using = %horizon, "unknown horizon");
    }
    horizon
}

fn run_analyze(
    settings: &Settings,
    symbol: String,
    horizon: &str,
    csv: Option<PathBuf>,
    offline: bool,
    synthetic: bool,
    format: OutputFormat,
) -> Result<()> {
    let horizon = parse_horizon(horizon);
    let provider = make_provider(offline || csv.is_some())?;
    let provider_ref = provider.as_ref().map(|p| p as &dyn QuoteProvider);

    let opts = LoadOptions {
        file: csv,
        offline,
        synthetic,
        ..LoadOptions::default()
    };
    let loaded = load_series(&SeriesRequest::new(&symbol, horizon), provider_ref, &opts)?;
    if loaded.is_synthetic() {
        tracing::warn!(symbol = %symbol, "results are computed on SYNTHETIC data");
    }

    let analysis = analyze(loaded.series, &settings.analysis)?;

    match format {
        OutputFormat::Summary => print_summary(settings, &symbol, horizon, &analysis),
        OutputFormat::Chart => println!("{}", ChartPayload::build(&analysis, horizon).to_json()?),
        OutputFormat::Csv => print!("{}", export_series_csv(&analysis.series)?),
        OutputFormat::Json => println!("{}", export_analysis_json(&analysis)?),
    }
    Ok(())
}

fn print_summary(
    settings: &Settings,
    symbol: &str,
    horizon: Horizon,
    analysis: &cotation_core::analysis::Analysis,
) {
    println!("{} ({horizon}, {} candles)", settings.display_name(symbol), analysis.series.len());
    match analysis.summary {
        Some(s) => {
            println!("  Open:    {:.2}", s.open);
            println!("  Close:   {:.2}", s.close);
            println!("  Change:  {:+.2} ({:+.2} %)", s.diff, s.percent);
        }
        None => println!("  No quotes."),
    }
    if let Some(rsi) = analysis.last_rsi() {
        println!("  RSI:     {rsi:.2}");
    }
}

fn run_report(
    settings: &Settings,
    symbols: Vec<String>,
    out_dir: &Path,
    offline: bool,
    synthetic: bool,
) -> Result<()> {
    let symbols: Vec<String> = if symbols.is_empty() {
        settings.watchlist.keys().cloned().collect()
    } else {
        symbols
    };
    if symbols.is_empty() {
        bail!("no symbols given and the watchlist is empty");
    }

    let provider = make_provider(offline)?;
    let opts = LoadOptions {
        offline,
        synthetic,
        ..LoadOptions::default()
    };

    let outcome = run_reports(
        &symbols,
        &settings.report.horizons,
        |symbol, horizon| {
            let provider_ref = provider.as_ref().map(|p| p as &dyn QuoteProvider);
            load_series(&SeriesRequest::new(symbol, horizon), provider_ref, &opts)
        },
        &settings.analysis,
    );

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    for report in &outcome.reports {
        let html_path = out_dir.join(format!("{}.html", report.symbol));
        std::fs::write(&html_path, &report.html)
            .with_context(|| format!("failed to write {}", html_path.display()))?;
        for part in &report.horizons {
            let chart_path = out_dir.join(format!("{}.json", part.section.image_cid));
            std::fs::write(&chart_path, part.chart.to_json()?)
                .with_context(|| format!("failed to write {}", chart_path.display()))?;
        }
        let tag = if report.has_synthetic() { " [SYNTHETIC]" } else { "" };
        println!("{}{tag}", report.subject);
    }

    if !outcome.failures.is_empty() {
        for (symbol, err) in &outcome.failures {
            eprintln!("Error for {symbol}: {err}");
        }
        bail!(
            "{} of {} reports failed",
            outcome.failures.len(),
            symbols.len()
        );
    }
    Ok(())
}

fn run_validate(path: &Path, symbol: &str) -> Result<()> {
    let (series, _) = load_quote_file(path, symbol)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let violations = validation_report(&series);

    if violations.is_empty() {
        println!("{}: {} quotes, no violations", path.display(), series.len());
        return Ok(());
    }

    for v in &violations {
        println!("{v}");
    }
    bail!(
        "{} violation(s) in {} quotes",
        violations.len(),
        series.len()
    )
}
