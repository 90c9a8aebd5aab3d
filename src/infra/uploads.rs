//! Filesystem upload storage: month-partitioned keys, size ceiling, atomic placement.

use std::error::Error as StdError;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::{StreamExt, pin_mut, stream};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::domain::uploads::{is_accepted_image, storage_key};

const PARTIAL_SUFFIX: &str = "part";

/// Errors that can occur while interacting with the upload storage backend.
#[derive(Debug, Error)]
pub enum UploadStorageError {
    #[error("uploaded file exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },
    #[error("`{file_name}` is not an accepted image type")]
    UnsupportedType { file_name: String },
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("uploaded file stream failed")]
    PayloadStream {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result of storing an upload payload.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Public URL path, e.g. `/uploads/2024-03/{uuid}.png`.
    pub url: String,
    /// Key relative to the storage root.
    pub stored_path: String,
    pub size_bytes: u64,
}

/// Filesystem-backed upload storage.
#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
    public_prefix: String,
    max_bytes: u64,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(
        root: PathBuf,
        public_prefix: impl Into<String>,
        max_bytes: u64,
    ) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
            max_bytes,
        })
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Stream a payload into storage.
    ///
    /// Bytes land in a `.part` sibling first and are renamed into place only once the
    /// whole payload is within limits, so a rejected or failed upload leaves no file
    /// behind at its final key.
    pub async fn store_stream<S>(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        stream: S,
    ) -> Result<StoredUpload, UploadStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        if !is_accepted_image(content_type, file_name) {
            return Err(UploadStorageError::UnsupportedType {
                file_name: file_name.to_string(),
            });
        }

        let stored_path = storage_key(file_name, Uuid::new_v4(), OffsetDateTime::now_utc());
        let absolute = self.resolve(&stored_path)?;
        let partial = absolute.with_extension(partial_extension(&absolute));

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let written = self.write_partial(&partial, stream).await;
        let size_bytes = match written {
            Ok(size) => size,
            Err(err) => {
                let _ = fs::remove_file(&partial).await;
                return Err(err);
            }
        };

        if let Err(err) = fs::rename(&partial, &absolute).await {
            let _ = fs::remove_file(&partial).await;
            return Err(UploadStorageError::Io(err));
        }

        Ok(StoredUpload {
            url: format!("{}/{stored_path}", self.public_prefix),
            stored_path,
            size_bytes,
        })
    }

    /// Store a fully-buffered payload. The size ceiling is checked before any disk access.
    pub async fn store(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredUpload, UploadStorageError> {
        if data.len() as u64 > self.max_bytes {
            return Err(UploadStorageError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }
        let stream = stream::once(async move { Ok::<_, UploadStorageError>(data) });
        self.store_stream(file_name, content_type, stream).await
    }

    /// Attempt to read the stored payload into memory.
    pub async fn read(&self, stored_path: &str) -> Result<Bytes, UploadStorageError> {
        let absolute = self.resolve(stored_path)?;
        let data = fs::read(absolute).await?;
        Ok(Bytes::from(data))
    }

    async fn write_partial<S>(&self, partial: &Path, stream: S) -> Result<u64, UploadStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        let mut file = fs::File::create(partial).await?;
        let mut total_bytes: u64 = 0;

        pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }

            total_bytes = total_bytes.saturating_add(chunk.len() as u64);
            if total_bytes > self.max_bytes {
                return Err(UploadStorageError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        if total_bytes == 0 {
            return Err(UploadStorageError::EmptyPayload);
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(total_bytes)
    }

    /// Resolve the absolute filesystem path for a stored upload.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, UploadStorageError> {
        let relative = Path::new(stored_path);
        if stored_path.is_empty()
            || relative.is_absolute()
            || relative.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::Prefix(_) | Component::RootDir
                )
            })
        {
            return Err(UploadStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }
}

fn partial_extension(path: &Path) -> String {
    match path.extension().and_then(|value| value.to_str()) {
        Some(ext) => format!("{ext}.{PARTIAL_SUFFIX}"),
        None => PARTIAL_SUFFIX.to_string(),
    }
}
