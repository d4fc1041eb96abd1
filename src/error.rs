//! Error types for the spinor front end

use std::path::PathBuf;

use spinor_core::part::PartDbError;
use thiserror::Error;

/// Front end errors
#[derive(Debug, Error)]
pub enum AppError {
    /// File could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Device file is not valid TOML or has unexpected fields
    #[error("Invalid device file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Device file value out of range
    #[error("Invalid value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Extra part definitions failed to load
    #[error("Failed to load part database: {0}")]
    PartDb(#[from] PartDbError),

    /// No part of that name is known
    #[error("Unknown part: {0}")]
    UnknownPart(String),

    /// Neither the command line nor the device file names a part
    #[error("No part specified. Use --part or set `part` in the device file")]
    NoPart,

    /// Image file is smaller than the part
    #[error("Image {path} holds {size} bytes but the part needs {capacity}")]
    ImageTooSmall {
        path: PathBuf,
        size: u64,
        capacity: u32,
    },

    /// Transaction script syntax error
    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    /// Emulator error
    #[error("Device error: {0}")]
    Device(#[from] spinor_core::Error),
}

impl AppError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AppError::Io { path, source }
    }
}

/// Result type for front end operations
pub type Result<T> = std::result::Result<T, AppError>;
