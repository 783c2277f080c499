/*!
 * Error types for the medtrans application.
 *
 * This module contains custom error types for the different parts of the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 *
 * Only `DocumentError::ExtractionFailed` is fatal to a document. Everything else
 * is recovered locally and surfaces as a degraded result flag.
 */

use thiserror::Error;

/// Errors raised while loading terminology data.
///
/// These never abort the process: the store falls back to its seed set and
/// records the error as the reason for running degraded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerminologyError {
    /// The backing file could not be read
    #[error("Failed to read terminology source {path}: {message}")]
    Io {
        /// Path of the source that failed
        path: String,
        /// Underlying I/O error message
        message: String,
    },

    /// The backing data is not a valid record list
    #[error("Malformed terminology source {path}: {message}")]
    Parse {
        /// Path of the source that failed
        path: String,
        /// Parser error message
        message: String,
    },

    /// The source parsed but contained no usable records
    #[error("Terminology source {0} contains no usable records")]
    Empty(String),
}

/// Errors raised by substitution rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The rule pattern does not compile
    #[error("Invalid pattern for rule '{description}': {message}")]
    InvalidPattern {
        /// Rule description
        description: String,
        /// Regex compiler message
        message: String,
    },

    /// The replacement template references a group the pattern does not define
    #[error("Invalid template for rule '{description}': {message}")]
    InvalidTemplate {
        /// Rule description
        description: String,
        /// What is wrong with the template
        message: String,
    },

    /// The rule failed while being applied; the cascade skips it
    #[error("Rule '{description}' failed: {message}")]
    ApplicationFailed {
        /// Rule description
        description: String,
        /// Failure detail
        message: String,
    },

    /// Marker cleanup did not reach a fixed point within its pass bound
    #[error("Annotation cleanup did not converge after {passes} passes")]
    CleanupDidNotConverge {
        /// Number of passes attempted
        passes: usize,
    },
}

/// Errors raised while processing a single page.
///
/// A page error never reaches the caller: the orchestrator converts it into a
/// fallback translation for that page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// A stage returned an error
    #[error("Stage '{stage}' failed: {message}")]
    StageFailed {
        /// Stage name
        stage: String,
        /// Failure detail
        message: String,
    },

    /// A stage panicked
    #[error("Stage '{stage}' panicked: {message}")]
    StagePanicked {
        /// Stage name
        stage: String,
        /// Panic payload, if it was a string
        message: String,
    },

    /// A rule error escaped the cascade
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

/// Document-level errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// No page text could be extracted; the document cannot be translated
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    /// The external renderer could not produce a page
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from terminology loading
    #[error("Terminology error: {0}")]
    Terminology(#[from] TerminologyError),

    /// Error from rule construction
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Document-level error
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
