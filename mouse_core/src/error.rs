// mouse_core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-class failures of the kernel. These are fatal: the caller
/// reports them and does not retry.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A layout description parsed cleanly but did not describe a single wall.
    #[error("layout '{source_name}' does not contain any wall cells")]
    EmptyLayout {
        /// File path or other label of the layout that was parsed.
        source_name: String,
    },

    /// A layout file could not be read.
    #[error("failed to read layout file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is outside the range the model can work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures of the byte transport underneath the hardware link.
///
/// A read that simply returns nothing is *not* an error; transports report
/// that as zero bytes read.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("link transport error: {0}")]
    Transport(String),
}
