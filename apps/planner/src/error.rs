//! # Planner Error Type
//!
//! Unified error type for the planner and its machine-readable report.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in barra-planner                          │
//! │                                                                         │
//! │  main()                                                                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  plan(&args, &config) -> PlannerResult<String>                   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad flag?    ─── PlannerError::InvalidArguments ──┐            │  │
//! │  │  Bad file?    ─── Read / Json / Toml ──────────────┤            │  │
//! │  │  Bad value?   ─── CoreError::Validation ───────────┤            │  │
//! │  │  Strict mode? ─── CoreError::DataQuality ──────────┤            │  │
//! │  │         │                                          ▼            │  │
//! │  │  Success ───► stdout              ErrorReport ───► stderr       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  --format json:   {"code":"VALIDATION_ERROR","message":"hours ..."}     │
//! │  --format table:  error [VALIDATION_ERROR]: hours ...                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use barra_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Command line could not be understood.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// A file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `PlannerConfig`.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Input document is not valid JSON for `PlanInput`, or output failed
    /// to serialize.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input failed validation, or a strict run had warnings.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for planner results.
pub type PlannerResult<T> = Result<T, PlannerError>;

// =============================================================================
// Error Report
// =============================================================================

/// What the planner prints when it fails in JSON mode.
///
/// ```json
/// {
///   "code": "DATA_QUALITY",
///   "message": "Shopping list has 2 data-quality warning(s)",
///   "warnings": [ { "kind": "empty_recipe", "cocktailId": "paloma" } ]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Warnings that made a strict run fail
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<barra_core::CalculationWarning>,
}

/// Error codes for the JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown flag or missing value
    InvalidArguments,

    /// Config file missing, unreadable or out of range
    ConfigError,

    /// Input file missing or malformed
    InputError,

    /// Input value out of range
    ValidationError,

    /// Strict run with warnings
    DataQuality,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::InvalidArguments => "INVALID_ARGUMENTS",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InputError => "INPUT_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DataQuality => "DATA_QUALITY",
        };
        f.write_str(code)
    }
}

impl ErrorReport {
    /// Creates a new report.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorReport {
            code,
            message: message.into(),
            warnings: Vec::new(),
        }
    }
}

impl PlannerError {
    /// Returns the report code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlannerError::InvalidArguments(_) => ErrorCode::InvalidArguments,
            PlannerError::InvalidConfig(_)
            | PlannerError::ConfigNotFound(_)
            | PlannerError::Toml(_) => ErrorCode::ConfigError,
            PlannerError::Read { .. } | PlannerError::Json(_) => ErrorCode::InputError,
            PlannerError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            PlannerError::Core(CoreError::DataQuality(_)) => ErrorCode::DataQuality,
        }
    }
}

/// Converts planner errors to reports.
impl From<&PlannerError> for ErrorReport {
    fn from(err: &PlannerError) -> Self {
        let mut report = ErrorReport::new(err.code(), err.to_string());
        if let PlannerError::Core(CoreError::DataQuality(warnings)) = err {
            report.warnings = warnings.clone();
        }
        report
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;
        for warning in &self.warnings {
            write!(f, "\n  - {}", warning)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
