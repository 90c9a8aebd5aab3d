//! File selection checks that run before any network call.

use std::path::Path;

use super::{MAX_UPLOAD_BYTES, PipelineError};

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PipelineError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Take exactly one image no larger than [`MAX_UPLOAD_BYTES`].
pub fn accept(files: Vec<SelectedFile>) -> Result<SelectedFile, PipelineError> {
    accept_with_limit(files, MAX_UPLOAD_BYTES)
}

pub fn accept_with_limit(
    mut files: Vec<SelectedFile>,
    limit: u64,
) -> Result<SelectedFile, PipelineError> {
    let file = match files.len() {
        0 => return Err(PipelineError::NoFile),
        1 => files.remove(0),
        n => return Err(PipelineError::TooManyFiles(n)),
    };

    if !file
        .content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
    {
        return Err(PipelineError::UnsupportedType(file.content_type));
    }

    if file.size() > limit {
        return Err(PipelineError::TooLarge {
            size: file.size(),
            limit,
        });
    }

    Ok(file)
}
