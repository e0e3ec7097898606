//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("File error: {0}")]
    File(#[from] satchel_file::FileError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] satchel_dispatch::DispatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),
}
