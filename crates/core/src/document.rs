use std::fs;
use std::path::Path;

use crate::ValidationError;

/// A PDF read from disk, held in memory only until it is submitted.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DocumentPayload {
    /// Reads `path` and checks that it carries the one supported media
    /// type. The type is guessed from the file extension.
    pub fn from_pdf_path(path: &Path) -> Result<Self, ValidationError> {
        if !path.is_file() {
            return Err(ValidationError::FileNotFound(path.to_path_buf()));
        }

        let detected = mime_guess::from_path(path).first_or_octet_stream();
        if detected != mime_guess::mime::APPLICATION_PDF {
            return Err(ValidationError::UnsupportedMediaType {
                path: path.to_path_buf(),
                detected: detected.to_string(),
            });
        }

        let bytes = fs::read(path).map_err(|source| ValidationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ValidationError::EmptyDocument(path.to_path_buf()));
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        Ok(Self { filename, bytes })
    }
}
