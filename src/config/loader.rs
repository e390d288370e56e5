//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the tax-regime
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{AllowanceConfig, PtkpFile, RegimeMetadata, TaxConfig, TaxFile};

/// Loads and provides access to the tax-regime configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates every table, and only then hands out a [`TaxConfig`]. A
/// malformed table is a fatal error: nothing can be computed with it.
///
/// # Directory Structure
///
/// ```text
/// config/pph21_2024/
/// ├── regime.yaml      # Regime metadata
/// ├── ptkp.yaml        # Non-taxable income thresholds
/// ├── tax.yaml         # Brackets, biaya jabatan, event withholding
/// └── allowances.yaml  # Position-level rules and in-kind allowances
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/pph21_2024").unwrap();
/// println!("Regime: {}", loader.regime().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TaxConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/pph21_2024")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any table fails validation (non-monotonic PTKP, gapped brackets, ...)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RegimeMetadata>(&path.join("regime.yaml"))?;
        let ptkp = Self::load_yaml::<PtkpFile>(&path.join("ptkp.yaml"))?;
        let tax = Self::load_yaml::<TaxFile>(&path.join("tax.yaml"))?;
        let allowances = Self::load_yaml::<AllowanceConfig>(&path.join("allowances.yaml"))?;

        let config = TaxConfig::new(
            metadata,
            ptkp.ptkp,
            tax.brackets,
            tax.position_cost,
            tax.event_withholding,
            allowances,
        )?;

        info!(
            path = %path.display(),
            regime = %config.regime().code,
            version = %config.regime().version,
            brackets = config.brackets().brackets().len(),
            "Loaded tax regime configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Consumes the loader, returning the validated configuration.
    pub fn into_config(self) -> TaxConfig {
        self.config
    }

    /// Returns the regime metadata.
    pub fn regime(&self) -> &RegimeMetadata {
        self.config.regime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PositionLevel;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/pph21_2024"
    }

    /// Copies the shipped configuration into a scratch directory so a single
    /// file can be replaced.
    fn scratch_config(name: &str, file: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "payroll_engine_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        for entry in ["regime.yaml", "ptkp.yaml", "tax.yaml", "allowances.yaml"] {
            fs::copy(Path::new(config_path()).join(entry), dir.join(entry)).unwrap();
        }
        fs::write(dir.join(file), content).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.regime().code, "PPH21-ID");
        assert_eq!(loader.regime().version, "2024-01-01");
    }

    #[test]
    fn test_loaded_ptkp_matches_reference_tables() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let ptkp = loader.config().ptkp();
        assert_eq!(ptkp.single, vec![54_000_000, 58_500_000, 63_000_000, 67_500_000]);
        assert_eq!(ptkp.married, vec![58_500_000, 63_000_000, 67_500_000, 72_000_000]);
    }

    #[test]
    fn test_loaded_brackets_match_reference_bands() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let brackets = loader.config().brackets().brackets();
        assert_eq!(brackets.len(), 4);
        assert_eq!(brackets[0].upper_bound, Some(60_000_000));
        assert_eq!(brackets[1].rate, Decimal::new(15, 2));
        assert_eq!(brackets[2].upper_bound, Some(500_000_000));
        assert_eq!(brackets[3].upper_bound, None);
        assert_eq!(brackets[3].rate, Decimal::new(30, 2));
    }

    #[test]
    fn test_loaded_event_rates_and_position_cost() {
        let config = ConfigLoader::load(config_path()).unwrap().into_config();
        assert_eq!(config.event_withholding().holiday_allowance_rate, Decimal::new(5, 2));
        assert_eq!(
            config.event_withholding().retroactive_settlement_rate,
            Decimal::new(5, 2)
        );
        assert_eq!(config.position_cost().annual_cap, 6_000_000);
        assert_eq!(config.position_cost().monthly_cap, 500_000);
    }

    #[test]
    fn test_loaded_staff_allowances() {
        let config = ConfigLoader::load(config_path()).unwrap().into_config();
        let staff = config.allowances().levels[&PositionLevel::Staff];
        assert_eq!(staff.rice, 400_000);
        assert_eq!(staff.meat, 500_000);
        assert_eq!(staff.show, 450_000);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("regime.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_yaml_returns_parse_error() {
        let dir = scratch_config("malformed", "ptkp.yaml", "ptkp: [not, a, table");
        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("ptkp.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_non_monotonic_brackets_is_rejected_before_use() {
        let tax = r#"
brackets:
  - lower_bound: 0
    upper_bound: 60000000
    rate: "0.15"
  - lower_bound: 60000000
    rate: "0.05"
position_cost:
  rate: "0.05"
  monthly_cap: 500000
  annual_cap: 6000000
event_withholding:
  holiday_allowance_rate: "0.05"
  retroactive_settlement_rate: "0.05"
"#;
        let dir = scratch_config("brackets", "tax.yaml", tax);
        match ConfigLoader::load(&dir) {
            Err(EngineError::InvalidConfig { table, .. }) => assert_eq!(table, "tax_bracket"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_non_monotonic_ptkp_is_rejected() {
        let ptkp = r#"
ptkp:
  single: [54000000, 58500000, 58500000, 67500000]
  married: [58500000, 63000000, 67500000, 72000000]
"#;
        let dir = scratch_config("ptkp", "ptkp.yaml", ptkp);
        match ConfigLoader::load(&dir) {
            Err(EngineError::InvalidConfig { table, .. }) => assert_eq!(table, "ptkp"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
        fs::remove_dir_all(dir).ok();
    }
}
