//! Errors raised while generating workflow files

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors specific to workflow generation
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to read template: {}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to list source directory: {}", path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read existing output: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid placeholder token")]
    Placeholder(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
