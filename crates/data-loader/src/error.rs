//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading the rating dataset.
///
/// Malformed lines are not errors: the parser skips and counts them (see
/// [`crate::parser::Parsed`]). Only problems that leave us without a usable
/// dataset surface here.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The ratings file did not yield a single user
    #[error("No users found in {path}")]
    EmptyDataset { path: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
