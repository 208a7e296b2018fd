// mouse_sim/src/error.rs

use mouse_core::error::CoreError;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Scenario file or environment override could not be extracted.
    #[error("Scenario configuration error: {0}")]
    Config(#[from] figment::Error),

    /// The kernel rejected the configuration or a layout.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Opening the hardware link failed.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `[run]` value the runner cannot work with.
    #[error("Invalid run settings: {0}")]
    InvalidRun(String),
}
