//! Error types for the chart pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading results or rendering charts.
#[derive(Error, Debug)]
pub enum Error {
    /// Input file does not exist. The driver reports this and exits cleanly.
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input could not be parsed into a benchmark table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// An artifact (or the output directory) could not be written.
    #[error("Failed to write {}: {message}", path.display())]
    WriteError { path: PathBuf, message: String },

    /// A chart could not be drawn.
    #[error("Failed to render view {view}: {message}")]
    Render { view: u8, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error should stop the whole run rather than a single view.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Render { .. } | Error::WriteError { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
