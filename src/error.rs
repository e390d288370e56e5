//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report. Callers can tell a rejected
//! input apart from a legitimately computed zero by matching on the variant.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/ptkp.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/ptkp.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration table parsed but violates its structural rules.
    #[error("Invalid {table} table: {message}")]
    InvalidConfig {
        /// The table that failed validation (e.g. "ptkp", "tax_bracket").
        table: String,
        /// A description of the violated rule.
        message: String,
    },

    /// A marital status value that is neither married nor single.
    #[error("Unknown marital status: {value}")]
    UnknownMaritalStatus {
        /// The rejected value.
        value: String,
    },

    /// An employee fact was invalid or contained inconsistent data.
    #[error("Invalid employee '{employee_code}' field '{field}': {message}")]
    InvalidEmployee {
        /// The code of the offending employee.
        employee_code: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A scalar input to a calculation was out of range or malformed.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input that was invalid.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A monetary amount exceeded the representable range.
    #[error("Monetary overflow while computing {context}")]
    Overflow {
        /// What was being computed when the overflow occurred.
        context: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidConfig`].
    pub fn invalid_config(table: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::Overflow`].
    pub fn overflow(context: impl Into<String>) -> Self {
        EngineError::Overflow {
            context: context.into(),
        }
    }

    /// Returns true when the error is a validation rejection of caller input,
    /// as opposed to a configuration or arithmetic failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownMaritalStatus { .. }
                | EngineError::InvalidEmployee { .. }
                | EngineError::InvalidInput { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
