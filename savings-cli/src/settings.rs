//! Optional TOML settings file.
//!
//! ```toml
//! [model]
//! monthly_visit_baseline = 1000
//!
//! [logging]
//! level = "debug"
//! file = "savings.log"
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use savings_core::{CalculatorConfig, CalculatorConfigError, DEFAULT_MONTHLY_VISIT_BASELINE};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid [model] settings: {0}")]
    Model(#[from] CalculatorConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    pub monthly_visit_baseline: Decimal,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            monthly_visit_baseline: DEFAULT_MONTHLY_VISIT_BASELINE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Level or full filter directive, e.g. `"info"` or `"savings_core=debug"`.
    pub level: Option<String>,
    /// Log file, appended to.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub model: ModelSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.calculator_config()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// The validated engine configuration.
    pub fn calculator_config(&self) -> Result<CalculatorConfig, SettingsError> {
        let config = CalculatorConfig {
            monthly_visit_baseline: self.model.monthly_visit_baseline,
        };
        config.validate()?;
        Ok(config)
    }
}
