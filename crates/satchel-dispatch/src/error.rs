//! Dispatcher error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the decrypt-and-fetch worker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Content failed authentication or decryption
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Failure raised by a browser host API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not open {file}: {reason}")]
pub struct OpenError {
    pub file: String,
    pub reason: String,
}

/// Failure of a single delivery attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// A native save-blob API was found but refused the file
    #[error("Save not possible via {api}: {reason}")]
    SaveNotPossible { api: String, reason: String },

    /// Object URL or link based delivery failed
    #[error("Cannot open file on this device: {0}")]
    CannotOpen(String),

    #[error("No delivery mechanism available")]
    Unsupported,

    #[error(transparent)]
    Open(#[from] OpenError),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Could not load file: {0}")]
    CouldNotLoadFile(String),
}

/// What the user is told when an operation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Content failed its integrity check
    Corrupted,
    Generic,
}
