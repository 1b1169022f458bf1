use std::fmt::Display;

use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, ImgdirError>;

/// Errors that can occur while reading or writing an imgdir document
#[derive(Error, Debug)]
pub enum ImgdirError {
    /// The XML could not be tokenized
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The XML is well-formed but is not an imgdir document
    #[error("Invalid document root: {0}")]
    InvalidRoot(String),

    /// Serialization failed
    #[error("Write error: {0}")]
    WriteError(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImgdirError {
    /// Create a parse error
    pub fn parse(msg: impl Display) -> Self {
        Self::ParseError(msg.to_string())
    }

    /// Create an invalid root error
    pub fn invalid_root(msg: impl Into<String>) -> Self {
        Self::InvalidRoot(msg.into())
    }

    /// Create a write error
    pub fn write(msg: impl Display) -> Self {
        Self::WriteError(msg.to_string())
    }
}
