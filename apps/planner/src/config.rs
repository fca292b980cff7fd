//! # Planner Configuration
//!
//! Defaults for every calculation the planner runs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Input document "settings" (highest priority, per event)            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BARRA_SAFETY_MARGIN=1.2                                            │
//! │     BARRA_DISTRIBUTION_MODE=legacy                                     │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/planner/planner.toml (Linux)                             │
//! │     ~/Library/Application Support/com.barra.planner/planner.toml       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     5 h, 1 drink/guest/hour, +10%, normalized                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # planner.toml
//! [calculation]
//! hours = 5.0
//! consumption_rate = 1.0
//! safety_margin = 1.1
//! extra_ice_bags = 2
//! distribution_mode = "normalized"  # normalized | legacy
//!
//! [output]
//! format = "table"  # table | json
//! strict = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use barra_core::{
    CalculationSettings, DistributionMode, DEFAULT_CONSUMPTION_RATE, DEFAULT_HOURS,
    DEFAULT_SAFETY_MARGIN,
};

use crate::error::{PlannerError, PlannerResult};

// =============================================================================
// Output Format
// =============================================================================

/// How the shopping list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Aligned text table with a warnings footer.
    #[default]
    Table,

    /// Pretty-printed `ShoppingList` JSON.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(PlannerError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: table, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Calculation Defaults
// =============================================================================

/// Settings used when an input document leaves a field out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDefaults {
    /// Service duration in hours.
    #[serde(default = "default_hours")]
    pub hours: f64,

    /// Drinks per guest per hour.
    #[serde(default = "default_consumption_rate")]
    pub consumption_rate: f64,

    /// Overhead factor for everything except ice.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,

    /// Bags added to every computed ice count.
    #[serde(default)]
    pub extra_ice_bags: Option<i32>,

    /// How cocktails without a percentage get their share.
    #[serde(default)]
    pub distribution_mode: DistributionMode,
}

fn default_hours() -> f64 {
    DEFAULT_HOURS
}

fn default_consumption_rate() -> f64 {
    DEFAULT_CONSUMPTION_RATE
}

fn default_safety_margin() -> f64 {
    DEFAULT_SAFETY_MARGIN
}

impl Default for CalculationDefaults {
    fn default() -> Self {
        CalculationDefaults {
            hours: default_hours(),
            consumption_rate: default_consumption_rate(),
            safety_margin: default_safety_margin(),
            extra_ice_bags: None,
            distribution_mode: DistributionMode::default(),
        }
    }
}

impl CalculationDefaults {
    /// Settings for an event that overrides nothing.
    pub fn to_settings(&self) -> CalculationSettings {
        CalculationSettings {
            hours: self.hours,
            consumption_rate: self.consumption_rate,
            safety_margin: self.safety_margin,
            distribution: Default::default(),
            extra_ice_bags: self.extra_ice_bags,
            distribution_mode: self.distribution_mode,
        }
    }
}

// =============================================================================
// Output Settings
// =============================================================================

/// Output behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Table or JSON.
    #[serde(default)]
    pub format: OutputFormat,

    /// Fail on any data-quality warning and validate input first.
    #[serde(default)]
    pub strict: bool,
}

// =============================================================================
// Planner Config
// =============================================================================

/// Complete planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Calculation defaults.
    #[serde(default)]
    pub calculation: CalculationDefaults,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSettings,
}

impl PlannerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or planner.toml in the platform
    ///    config dir). An explicit path must exist.
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> PlannerResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(PlannerError::ConfigNotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load planner config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> PlannerResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn from_file(path: &Path) -> PlannerResult<Self> {
        info!(?path, "Loading planner config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| PlannerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PlannerResult<()> {
        barra_core::validation::validate_settings(&self.calculation.to_settings())
            .map_err(|e| PlannerError::InvalidConfig(e.to_string()))
    }

    /// Applies `BARRA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(key, value = %value, "Ignoring unparseable environment override");
                    None
                }
            }
        }

        if let Some(hours) = parsed::<f64>("BARRA_HOURS", var("BARRA_HOURS")) {
            debug!(hours, "Overriding hours from environment");
            self.calculation.hours = hours;
        }

        if let Some(rate) = parsed::<f64>("BARRA_CONSUMPTION_RATE", var("BARRA_CONSUMPTION_RATE")) {
            self.calculation.consumption_rate = rate;
        }

        if let Some(margin) = parsed::<f64>("BARRA_SAFETY_MARGIN", var("BARRA_SAFETY_MARGIN")) {
            debug!(margin, "Overriding safety margin from environment");
            self.calculation.safety_margin = margin;
        }

        if let Some(extra) = parsed::<i32>("BARRA_EXTRA_ICE_BAGS", var("BARRA_EXTRA_ICE_BAGS")) {
            self.calculation.extra_ice_bags = Some(extra);
        }

        if let Some(mode) = parsed::<DistributionMode>("BARRA_DISTRIBUTION_MODE", var("BARRA_DISTRIBUTION_MODE")) {
            debug!(mode = %mode, "Overriding distribution mode from environment");
            self.calculation.distribution_mode = mode;
        }

        if let Some(format) = parsed::<OutputFormat>("BARRA_OUTPUT_FORMAT", var("BARRA_OUTPUT_FORMAT")) {
            self.output.format = format;
        }

        if let Some(strict) = var("BARRA_STRICT") {
            match strict.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.output.strict = true,
                "0" | "false" | "no" | "off" => self.output.strict = false,
                _ => warn!(value = %strict, "Unknown BARRA_STRICT value in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "barra", "planner")
            .map(|dirs| dirs.config_dir().join("planner.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.calculation.hours, 5.0);
        assert_eq!(config.calculation.consumption_rate, 1.0);
        assert_eq!(config.calculation.safety_margin, 1.1);
        assert_eq!(config.calculation.distribution_mode, DistributionMode::Normalized);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert!(!config.output.strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            [calculation]
            safety_margin = 1.25
            distribution_mode = "legacy"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.calculation.safety_margin, 1.25);
        assert_eq!(config.calculation.hours, 5.0);
        assert_eq!(config.calculation.distribution_mode, DistributionMode::Legacy);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = PlannerConfig::from_toml_str("[calculation]\nhours = \"late\"").unwrap_err();
        assert!(matches!(err, PlannerError::Toml(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = PlannerConfig::default();
        config.apply_overrides(lookup(&[
            ("BARRA_HOURS", "6"),
            ("BARRA_CONSUMPTION_RATE", "1.5"),
            ("BARRA_SAFETY_MARGIN", " 1.2 "),
            ("BARRA_EXTRA_ICE_BAGS", "-2"),
            ("BARRA_DISTRIBUTION_MODE", "legacy"),
            ("BARRA_OUTPUT_FORMAT", "json"),
            ("BARRA_STRICT", "yes"),
        ]));

        assert_eq!(config.calculation.hours, 6.0);
        assert_eq!(config.calculation.consumption_rate, 1.5);
        assert_eq!(config.calculation.safety_margin, 1.2);
        assert_eq!(config.calculation.extra_ice_bags, Some(-2));
        assert_eq!(config.calculation.distribution_mode, DistributionMode::Legacy);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.strict);
    }

    #[test]
    fn test_unparseable_overrides_are_ignored() {
        let mut config = PlannerConfig::default();
        config.apply_overrides(lookup(&[
            ("BARRA_HOURS", "all night"),
            ("BARRA_DISTRIBUTION_MODE", "random"),
            ("BARRA_STRICT", "maybe"),
        ]));
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PlannerConfig::default();
        config.calculation.safety_margin = 0.5;
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidConfig(_))
        ));

        config.calculation.safety_margin = 1.1;
        config.calculation.hours = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let path = std::env::temp_dir().join("barra-planner-does-not-exist.toml");
        assert!(matches!(
            PlannerConfig::load(Some(path)),
            Err(PlannerError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "barra-planner-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[calculation]\nhours = 3.5\n").unwrap();

        let config = PlannerConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.unwrap().calculation.hours, 3.5);
    }

    #[test]
    fn test_toml_serialization() {
        let config = PlannerConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[calculation]"));
        assert!(toml_str.contains("[output]"));
    }
}
