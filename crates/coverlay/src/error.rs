//! Error types for the coverage pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type for coverage pipeline operations
pub type Result<T> = std::result::Result<T, CoverlayError>;

/// Errors that can occur in the coverage pipeline
///
/// The taxonomy mirrors the failure channels of the pipeline: configuration
/// loading aborts session startup, while sourcemap and instrumentation
/// failures are surfaced per module and leave the session running.
#[derive(Debug, Error)]
pub enum CoverlayError {
    /// Project configuration could not be loaded or parsed
    #[error("failed to load project config {path}: {message}")]
    ConfigLoad {
        /// Path of the offending config file
        path: PathBuf,
        /// Underlying parse or read failure
        message: String,
    },

    /// An include/exclude pattern did not compile
    #[error("invalid instrumentation pattern `{pattern}`: {message}")]
    Pattern {
        /// The glob pattern as written
        pattern: String,
        /// Matcher error detail
        message: String,
    },

    /// A sourcemap handed to the sanitizer violated its contract
    #[error("sourcemap contract violation: {message}")]
    SourcemapContract {
        /// What the sanitizer received instead of a map object
        message: String,
    },

    /// The instrumentation engine rejected a module
    #[error("instrumentation failed for {filename}: {message}")]
    Instrumentation {
        /// Normalized filename of the module being instrumented
        filename: String,
        /// Engine error detail
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CoverlayError {
    /// Create a configuration load error
    #[must_use]
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a pattern error
    #[must_use]
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a sourcemap contract error
    #[must_use]
    pub fn sourcemap_contract(message: impl Into<String>) -> Self {
        Self::SourcemapContract {
            message: message.into(),
        }
    }

    /// Create an instrumentation error
    #[must_use]
    pub fn instrumentation(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Instrumentation {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts session startup rather than a single module
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::Pattern { .. } | Self::Io(_))
    }
}
