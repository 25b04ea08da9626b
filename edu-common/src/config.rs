//! Configuration loading and resolution
//!
//! Config file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `EDU_PLANNER_CONFIG` environment variable
//! 3. User config file (`<config_dir>/edu-planner/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A file named explicitly (CLI or ENV) must load; a broken or missing user
//! config file only produces a warning and the compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "EDU_PLANNER_CONFIG";

/// Application directory name under the platform config dir
const APP_DIR: &str = "edu-planner";

/// Full planner configuration as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    pub validator: ValidatorConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[scheduler]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Add each camp day's rounding shortfall back onto its longest block.
    ///
    /// Off reproduces the plain floor-rounding drift.
    pub reconcile_camp_remainder: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reconcile_camp_remainder: true,
        }
    }
}

/// `[validator]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Minimum weighted score for an overall pass (critical veto still applies)
    pub pass_threshold: f64,
    /// Per-rule weight overrides keyed by rule name (e.g. `requirement_match`)
    pub weights: BTreeMap<String, f64>,
    /// Rules that are not run at all
    pub disabled_rules: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 0.7,
            weights: BTreeMap::new(),
            disabled_rules: Vec::new(),
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Range checks that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let threshold = self.validator.pass_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "validator.pass_threshold must be within [0, 1], got {}",
                threshold
            )));
        }

        for (rule, weight) in &self.validator.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::Config(format!(
                    "validator.weights.{} must be a non-negative number, got {}",
                    rule, weight
                )));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("logging.level must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Default user config file path for the platform, if a config dir exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Config resolver implementing the CLI → ENV → user file → defaults order
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create resolver; `cli_path` is the `--config` argument, if given
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self {
            cli_path,
            user_path: default_config_path(),
        }
    }

    /// Override the user config location (tests, packaging)
    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_path = path;
        self
    }

    /// Resolve configuration
    pub fn resolve(&self) -> Result<PlannerConfig> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            info!("Loading config from command line: {}", path.display());
            return PlannerConfig::load_from(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                info!("Loading config from {}: {}", CONFIG_ENV_VAR, path);
                return PlannerConfig::load_from(Path::new(&path));
            }
        }

        // Priority 3: User config file
        if let Some(path) = &self.user_path {
            if path.exists() {
                match PlannerConfig::load_from(path) {
                    Ok(config) => {
                        info!("Loaded config: {}", path.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!("Ignoring config file {}: {}. Using defaults.", path.display(), e);
                    }
                }
            } else {
                debug!("No config file at {}", path.display());
            }
        }

        // Priority 4: Compiled defaults
        Ok(PlannerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.scheduler.reconcile_camp_remainder);
        assert_eq!(config.validator.pass_threshold, 0.7);
        assert!(config.validator.weights.is_empty());
        assert!(config.validator.disabled_rules.is_empty());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = PlannerConfig::from_toml_str(
            r#"
            [validator]
            pass_threshold = 0.55

            [validator.weights]
            feasibility = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.validator.pass_threshold, 0.55);
        assert_eq!(config.validator.weights.get("feasibility"), Some(&0.0));
        // Untouched sections keep their defaults
        assert!(config.scheduler.reconcile_camp_remainder);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = PlannerConfig::from_toml_str("[validator]\npass_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = PlannerConfig::from_toml_str("[validator.weights]\nrequirement_match = -0.1\n")
            .unwrap_err();
        assert!(err.to_string().contains("requirement_match"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = PlannerConfig::from_toml_str("[scheduler\n").unwrap_err();
        assert!(err.to_string().contains("Parse TOML failed"));
    }
}
