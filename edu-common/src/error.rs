//! Common error types for the planner crates

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the outer surface (config files, input files).
///
/// The pipeline itself never fails; see the per-stage error enums in
/// `edu-planner` for failures that are isolated into fallback results.
#[derive(Error, Debug)]
pub enum Error {
    /// File could not be read
    #[error("IO error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
