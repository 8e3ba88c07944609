//! Core error types for rowing-core.
//!
//! Parse failures are per-line and never abort a run; I/O, chart and
//! configuration failures abort the current run only. Everything funnels
//! into [`CoreError`] at the pipeline boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rowing-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading an input file or writing an output file failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chart-related errors
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unknown dataset selector
    #[error("Unknown dataset mode '{0}' (expected 1-5)")]
    UnknownMode(String),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single input line that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The line does not follow `DD.MM.YYYY,M:SS.T,VALUE UNIT`
    #[error("Line did not match pattern: {line}")]
    PatternMismatch { line: String },

    /// The line is well-formed but one of its fields is not a valid value
    #[error("Error parsing line '{line}': {cause}")]
    SemanticFailure {
        line: String,
        #[source]
        cause: SemanticCause,
    },
}

impl ParseError {
    /// The offending input line, untrimmed.
    pub fn line(&self) -> &str {
        match self {
            ParseError::PatternMismatch { line } | ParseError::SemanticFailure { line, .. } => {
                line
            }
        }
    }
}

/// Why a structurally valid line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticCause {
    #[error("invalid date '{text}': {source}")]
    InvalidDate {
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("date '{0}' is before year 1")]
    DateOutOfRange(String),

    #[error(transparent)]
    Pace(#[from] PaceFormatError),

    #[error("pace must be greater than zero")]
    NonPositivePace,

    #[error("invalid value '{0}'")]
    InvalidValue(String),
}

/// A pace string that is not `M:SS.T` / `MM:SS.T`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaceFormatError {
    #[error("pace '{0}' is missing the ':' separator")]
    MissingColon(String),

    #[error("pace '{0}' is missing the '.' before tenths")]
    MissingTenths(String),

    #[error("pace '{text}' has a malformed {segment} segment")]
    Segment { text: String, segment: &'static str },
}

/// Power derivation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PowerError {
    /// Zero or negative pace
    #[error("Invalid argument: pace must be greater than zero")]
    InvalidArgument,

    /// The rounded wattage does not fit an integer watt value
    #[error("Power of {0} W is out of range")]
    OutOfRange(f64),
}

/// Chart building errors.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Regression requested with fewer than two points
    #[error("Insufficient data for regression: need at least 2 points, got {0}")]
    InsufficientData(usize),

    /// All points share one date, so the fit has no slope
    #[error("Cannot fit a regression line: all points share the same date")]
    DegenerateFit,

    /// The plotting backend failed
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// The plots directory could not be created
    #[error("Failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare config directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
