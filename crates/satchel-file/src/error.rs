//! File error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}
