//! Error types for the pocketnotes library.
//!
//! Only the persistence adapter produces errors; store mutations are silent
//! no-ops when their target is missing and never fail outwardly.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for pocketnotes storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    Directory { path: PathBuf },
}
