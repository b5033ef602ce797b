//! Error handling for synoptiq
//!
//! Provides the error types shared by every crate in the workspace:
//! - Data errors (fetching, saving, decoding, geometry validation)
//! - Color errors (CSS color parsing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Data layer error type
///
/// Represents failures of the injected file store and of decoding the
/// floor-plan JSON resources.
#[derive(Error, Debug)]
pub enum DataError {
    /// A resource could not be fetched
    #[error("Failed to fetch {path}: {reason}")]
    Fetch {
        /// The path that was requested.
        path: String,
        /// The reason the fetch failed.
        reason: String,
    },

    /// A resource could not be saved
    #[error("Failed to save {relative_path}/{file_name}: {reason}")]
    Save {
        /// Folder the file was written to, relative to the exercise.
        relative_path: String,
        /// File name without extension.
        file_name: String,
        /// The reason the save failed.
        reason: String,
    },

    /// A resource was fetched but did not have the expected shape
    #[error("Invalid {resource} data: {source}")]
    Decode {
        /// Which resource slot was being decoded.
        resource: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Geometry references missing vertices or has degenerate rings
    #[error("Invalid geometry for feature {feature_id}: {reason}")]
    InvalidGeometry {
        /// The offending feature.
        feature_id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An operation needs data that has not been loaded yet
    #[error("No {resource} loaded")]
    NotLoaded {
        /// The missing resource slot.
        resource: String,
    },
}

impl DataError {
    /// Create a fetch error for a path
    pub fn fetch(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DataError::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error came from the file store rather than the data itself
    pub fn is_io(&self) -> bool {
        matches!(self, DataError::Fetch { .. } | DataError::Save { .. })
    }
}

/// Color parsing error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not a recognised color notation
    #[error("Unrecognised color '{0}'")]
    Unrecognised(String),

    /// A component was out of range or not a number
    #[error("Invalid component '{component}' in color '{color}'")]
    InvalidComponent {
        /// The full color string.
        color: String,
        /// The component that failed to parse.
        component: String,
    },
}

/// Main error type for synoptiq
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Data error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Color error
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a data error
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Data(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
