//! Error types for the teleop runtime
//!
//! Every fallible operation outside the arbiter policy returns [`TeleopResult`].

use std::sync::PoisonError;
use thiserror::Error;

/// Main error type for the teleop runtime
#[derive(Debug, Error)]
pub enum TeleopError {
    /// Filesystem or stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure encoding or decoding a parameter document
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A node could not be brought up
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// A collaborator device rejected its setup
    #[error("Device setup failed for '{device}': {reason}")]
    DeviceSetup { device: String, reason: String },

    /// Caller supplied a value outside the accepted range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected internal state
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used across the workspace
pub type TeleopResult<T> = Result<T, TeleopError>;

impl TeleopError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TeleopError::Config(msg.into())
    }

    pub fn device_setup<D: Into<String>, R: Into<String>>(device: D, reason: R) -> Self {
        TeleopError::DeviceSetup {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TeleopError {
    fn from(err: serde_json::Error) -> Self {
        TeleopError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for TeleopError {
    fn from(err: serde_yaml::Error) -> Self {
        TeleopError::Serialization(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for TeleopError {
    fn from(err: PoisonError<T>) -> Self {
        TeleopError::Internal(format!("Lock poisoned: {}", err))
    }
}
