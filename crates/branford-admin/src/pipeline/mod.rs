//! Image intake, compression and cropping for admin image fields.
//!
//! The pipeline runs in order: [`intake`] picks and checks the file, [`compress`]
//! shrinks large images, the bytes are uploaded, then [`crop`] cuts the final square.
//! [`field::ImageField`] drives those steps for a single form field.

pub mod compress;
pub mod crop;
pub mod field;
pub mod intake;

use std::path::PathBuf;

use thiserror::Error;

use crate::client::ClientError;

/// Client-side ceiling, matching the server's default upload limit.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;
/// Files above this size are re-encoded before upload.
pub const COMPRESS_THRESHOLD_BYTES: usize = 1024 * 1024;
/// Longest edge after compression.
pub const MAX_DIMENSION: u32 = 1600;
pub const JPEG_QUALITY: u8 = 85;
/// Largest default crop square.
pub const CROP_CAP: u32 = 1000;
/// Smallest image edge that can be cropped.
pub const MIN_IMAGE_SIDE: u32 = 200;
/// Smallest selection edge.
pub const MIN_SELECTION: u32 = 50;

/// Every variant renders as a message fit to show next to the field.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Please choose an image to upload.")]
    NoFile,
    #[error("Only one image can be uploaded at a time ({0} were selected).")]
    TooManyFiles(usize),
    #[error("Only image files can be uploaded (got {0}).")]
    UnsupportedType(String),
    #[error("File size exceeds {}MB limit. Please choose a smaller image.", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
    #[error(
        "Image is too small. Please use a larger image (at least {min}x{min} pixels, got {width}x{height})."
    )]
    ImageTooSmall { width: u32, height: u32, min: u32 },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Image processing stopped unexpectedly: {0}")]
    Worker(String),
    #[error("Upload failed: {0}")]
    Upload(#[from] ClientError),
    #[error("Cannot {action} while the field is {state}.")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}
