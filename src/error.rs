//! Error types for corpus analysis.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`AnalysisError`]. Precondition violations are raised at the call that
//! violates them; the report layer checks its inputs before calling so that a
//! normal run never hits them.

use std::io;

use thiserror::Error;

/// All conditions the analysis pipeline can surface.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A non-empty population was required but the input was empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A score was requested that is mathematically undefined (e.g. log of zero).
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// An option or argument is outside its valid domain.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input documents could not be read or parsed.
    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    /// A chart backend failed to draw or encode an image.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O errors while writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with [`AnalysisError`].
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        AnalysisError::InvalidInput(msg.into())
    }

    pub fn arithmetic<S: Into<String>>(msg: S) -> Self {
        AnalysisError::Arithmetic(msg.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        AnalysisError::Configuration(msg.into())
    }

    pub fn input_unavailable<S: Into<String>>(msg: S) -> Self {
        AnalysisError::InputUnavailable(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        AnalysisError::Render(msg.into())
    }
}
