use quest_imgdir::ImgdirError;
use thiserror::Error;

use crate::record::RecordId;

/// Result type for record operations
pub type Result<T> = std::result::Result<T, RecordError>;

/// Errors surfaced by record operations. Lookups that simply find nothing
/// are reported through outcome values instead.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Clone source does not exist in the document
    #[error("Base quest {0} not found")]
    SourceNotFound(RecordId),

    /// Id list contained tokens that are not non-negative integers
    #[error("Invalid quest ids: {}", .0.join(", "))]
    InvalidIds(Vec<String>),

    /// Id list was empty
    #[error("No quest ids given")]
    NoIds,

    /// Document could not be read or written
    #[error(transparent)]
    Document(#[from] ImgdirError),
}

impl RecordError {
    /// Create an invalid ids error
    pub fn invalid_ids(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::InvalidIds(tokens.into_iter().map(Into::into).collect())
    }
}
