//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the tax-regime configuration
//! from YAML files: regime metadata, PTKP tables, progressive brackets,
//! biaya jabatan parameters, event withholding rates, and position-level
//! allowances.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/pph21_2024").unwrap();
//! println!("Loaded regime: {}", config.regime().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceConfig, EventWithholding, InKindAllowances, PTKP_TABLE_LEN, PositionCost,
    PositionLevel, PtkpFile, PtkpTable, RegimeMetadata, TaxBracket, TaxBracketTable, TaxConfig,
    TaxFile,
};

#[cfg(test)]
pub(crate) use types::tests::reference_config;
