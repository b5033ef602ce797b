//! Error types for the viewer crate.

use std::io;
use thiserror::Error;

/// Errors raised while exporting rendered output.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// No surface is attached to the host.
    #[error("No surface attached")]
    NotAttached,

    /// The surface has zero width or height.
    #[error("Surface is empty ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ViewerError> for synoptiq_core::Error {
    fn from(err: ViewerError) -> Self {
        synoptiq_core::Error::other(err.to_string())
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
