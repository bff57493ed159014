//! Configuration error types.
//!
//! The simulation itself never fails: out-of-range values are clamped.
//! Only loading and validating settings can produce an error.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}
