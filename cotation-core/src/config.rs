//! Analysis parameters and application settings, loaded from TOML.
//!
//! ```toml
//! [analysis]
//! short_window = 7
//! long_window = 20
//! pivot_window = 30
//! validate_input = false
//!
//! [watchlist]
//! BTCUSDC = "Bitcoin (BTC/USDC)"
//!
//! [report]
//! horizons = ["1m", "1w"]
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::domain::Horizon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Window parameters for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Periods in the short moving average.
    pub short_window: usize,
    /// Periods in the long moving average.
    pub long_window: usize,
    /// Half-width of the pivot neighborhood.
    pub pivot_window: usize,
    /// Run the input guard before analyzing and fail on violations.
    pub validate_input: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            short_window: 7,
            long_window: 20,
            pivot_window: 30,
            validate_input: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(ConfigError::Invalid(
                "moving average windows must be >= 1".into(),
            ));
        }
        if self.pivot_window == 0 {
            return Err(ConfigError::Invalid("pivot_window must be >= 1".into()));
        }
        Ok(())
    }
}

/// Which horizons an email report covers, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub horizons: Vec<Horizon>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            horizons: vec![Horizon::Month, Horizon::Week],
        }
    }
}

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisConfig,
    /// Symbol → display name.
    pub watchlist: BTreeMap<String, String>,
    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let watchlist = [
            ("BTCUSDC", "Bitcoin (BTC/USDC)"),
            ("ETHUSDC", "Ethereum (ETH/USDC)"),
            ("SOLUSDC", "Solana (SOL/USDC)"),
            ("XRPUSDC", "Ripple (XRP/USDC)"),
            ("ADAUSDC", "Cardano (ADA/USDC)"),
        ]
        .into_iter()
        .map(|(s, n)| (s.to_string(), n.to_string()))
        .collect();

        Self {
            analysis: AnalysisConfig::default(),
            watchlist,
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.report.horizons.is_empty() {
            return Err(ConfigError::Invalid("report.horizons must not be empty".into()));
        }
        Ok(())
    }

    /// Display name for a symbol, falling back to the symbol itself.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.watchlist
            .get(symbol)
            .map(|s| s.as_str())
            .unwrap_or(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_windows() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.short_window, 7);
        assert_eq!(cfg.long_window, 20);
        assert_eq!(cfg.pivot_window, 30);
        assert!(!cfg.validate_input);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.watchlist.len(), 5);
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let settings = Settings::from_toml(
            r#"
[analysis]
pivot_window = 10

[report]
horizons = ["1w"]
"#,
        )
        .unwrap();
        assert_eq!(settings.analysis.pivot_window, 10);
        assert_eq!(settings.analysis.short_window, 7);
        assert_eq!(settings.report.horizons, vec![Horizon::Week]);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = Settings::from_toml("[analysis]\nshort_window = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_horizon_is_a_parse_error() {
        let err = Settings::from_toml("[report]\nhorizons = [\"2w\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn display_name_falls_back_to_symbol() {
        let settings = Settings::default();
        assert_eq!(settings.display_name("BTCUSDC"), "Bitcoin (BTC/USDC)");
        assert_eq!(settings.display_name("DOGEUSDC"), "DOGEUSDC");
    }
}
