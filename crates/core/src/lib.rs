use std::path::PathBuf;
use thiserror::Error;

pub mod document;
pub mod recipient;

pub use document::DocumentPayload;
pub use recipient::Recipient;

/// Rejections raised before any network call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid recipient fax number: {0}")]
    InvalidRecipient(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file type: {detected} ({})", .path.display())]
    UnsupportedMediaType { path: PathBuf, detected: String },

    #[error("document is empty: {}", .0.display())]
    EmptyDocument(PathBuf),
}
