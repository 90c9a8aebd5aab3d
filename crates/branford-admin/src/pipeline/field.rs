//! State machine for one image form field.
//!
//! `Empty → Uploading → CropPending → Cropping → Committed`, with [`ImageField::remove`]
//! returning to `Empty` from anywhere. The committed value is what gets saved through
//! the content API; failures record a message and never touch it.

use branford_api_types::UploadResponse;

use super::PipelineError;
use super::compress::compress;
use super::crop::{CropFrame, Selection, crop_to_data_uri};
use super::intake::{SelectedFile, accept};
use crate::client::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Uploading,
    CropPending,
    Cropping,
    Committed,
}

impl FieldState {
    fn as_str(self) -> &'static str {
        match self {
            FieldState::Empty => "empty",
            FieldState::Uploading => "uploading",
            FieldState::CropPending => "waiting to be cropped",
            FieldState::Cropping => "cropping",
            FieldState::Committed => "committed",
        }
    }
}

/// Uploaded image waiting for (or undergoing) a crop.
#[derive(Debug, Clone)]
pub struct WorkingImage {
    pub url: String,
    pub bytes: Vec<u8>,
    pub frame: CropFrame,
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    Uploading,
    CropPending(WorkingImage),
    Cropping(WorkingImage, Selection),
}

#[derive(Debug, Clone)]
pub struct ImageField {
    stage: Stage,
    committed: Option<String>,
    error: Option<String>,
}

impl Default for ImageField {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ImageField {
    /// Start from a stored value; an empty string counts as no image.
    pub fn new(value: Option<String>) -> Self {
        Self {
            stage: Stage::Idle,
            committed: value.filter(|v| !v.trim().is_empty()),
            error: None,
        }
    }

    pub fn state(&self) -> FieldState {
        match (&self.stage, &self.committed) {
            (Stage::Idle, None) => FieldState::Empty,
            (Stage::Idle, Some(_)) => FieldState::Committed,
            (Stage::Uploading, _) => FieldState::Uploading,
            (Stage::CropPending(_), _) => FieldState::CropPending,
            (Stage::Cropping(..), _) => FieldState::Cropping,
        }
    }

    /// Value to persist; empty when nothing is committed.
    pub fn value(&self) -> &str {
        self.committed.as_deref().unwrap_or("")
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn working_image(&self) -> Option<&WorkingImage> {
        match &self.stage {
            Stage::CropPending(image) | Stage::Cropping(image, _) => Some(image),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        match &self.stage {
            Stage::Cropping(_, selection) => Some(*selection),
            _ => None,
        }
    }

    /// Intake and compression. On success the field is `Uploading` and the bytes to
    /// send are returned.
    pub fn prepare_upload(
        &mut self,
        files: Vec<SelectedFile>,
    ) -> Result<SelectedFile, PipelineError> {
        self.ensure_can_upload()?;
        let prepared = accept(files).and_then(compress);
        self.start_upload(prepared)
    }

    fn ensure_can_upload(&mut self) -> Result<(), PipelineError> {
        let state = self.state();
        if matches!(state, FieldState::Uploading | FieldState::Cropping) {
            return self.fail(PipelineError::InvalidState {
                action: "start an upload",
                state: state.as_str(),
            });
        }
        Ok(())
    }

    fn start_upload(
        &mut self,
        prepared: Result<SelectedFile, PipelineError>,
    ) -> Result<SelectedFile, PipelineError> {
        let file = match prepared {
            Ok(file) => file,
            Err(err) => return self.fail(err),
        };
        self.error = None;
        self.stage = Stage::Uploading;
        Ok(file)
    }

    /// Record the outcome of the upload started by [`ImageField::prepare_upload`].
    pub fn finish_upload(
        &mut self,
        file: SelectedFile,
        result: Result<UploadResponse, PipelineError>,
    ) -> Result<(), PipelineError> {
        if !matches!(self.stage, Stage::Uploading) {
            return self.fail(PipelineError::InvalidState {
                action: "finish an upload",
                state: self.state().as_str(),
            });
        }

        let uploaded = result.and_then(|response| {
            let frame = CropFrame::measure(&file.bytes)?;
            Ok(WorkingImage {
                url: response.url,
                bytes: file.bytes,
                frame,
            })
        });

        match uploaded {
            Ok(image) => {
                self.stage = Stage::CropPending(image);
                Ok(())
            }
            Err(err) => {
                self.stage = Stage::Idle;
                self.fail(err)
            }
        }
    }

    /// Intake, compress and upload in one step.
    pub async fn upload(
        &mut self,
        client: &ApiClient,
        files: Vec<SelectedFile>,
    ) -> Result<(), PipelineError> {
        self.ensure_can_upload()?;
        let prepared = match accept(files) {
            Ok(file) => run_blocking(move || compress(file)).await,
            Err(err) => Err(err),
        };
        let file = self.start_upload(prepared)?;
        let result = client
            .upload(&file.name, &file.content_type, file.bytes.clone())
            .await
            .map_err(PipelineError::from);
        self.finish_upload(file, result)
    }

    /// Open the crop step with the default selection. `display` is the on-screen size
    /// of the image; `None` means it is shown at natural size.
    pub fn begin_crop(&mut self, display: Option<(u32, u32)>) -> Result<Selection, PipelineError> {
        let Stage::CropPending(image) = &self.stage else {
            return self.fail(PipelineError::InvalidState {
                action: "crop",
                state: self.state().as_str(),
            });
        };

        let mut image = image.clone();
        if let Some(display) = display {
            image.frame = CropFrame::displayed(image.frame.natural_size(), display);
        }
        let selection = match image.frame.default_selection() {
            Ok(selection) => selection,
            Err(err) => return self.fail(err),
        };

        self.error = None;
        self.stage = Stage::Cropping(image, selection);
        Ok(selection)
    }

    /// Move or resize the selection; the stored rectangle is clamped.
    pub fn adjust(&mut self, selection: Selection) -> Result<Selection, PipelineError> {
        if let Stage::Cropping(image, current) = &mut self.stage {
            *current = image.frame.clamp(selection);
            return Ok(*current);
        }
        self.fail(PipelineError::InvalidState {
            action: "adjust the selection",
            state: self.state().as_str(),
        })
    }

    /// Leave the crop step without changing the committed value.
    pub fn cancel_crop(&mut self) {
        if let Stage::Cropping(image, _) = &self.stage {
            self.stage = Stage::CropPending(image.clone());
        }
    }

    /// Export the selection and make it the committed value.
    pub fn commit_crop(&mut self) -> Result<&str, PipelineError> {
        let Stage::Cropping(image, selection) = &self.stage else {
            return self.fail(PipelineError::InvalidState {
                action: "apply a crop",
                state: self.state().as_str(),
            });
        };

        match crop_to_data_uri(&image.bytes, &image.frame, *selection) {
            Ok(uri) => {
                self.stage = Stage::Idle;
                self.error = None;
                Ok(self.committed.insert(uri).as_str())
            }
            Err(err) => self.fail(err),
        }
    }

    /// [`ImageField::commit_crop`] with the decode and encode moved off the async runtime.
    pub async fn commit_crop_in_background(&mut self) -> Result<&str, PipelineError> {
        let Stage::Cropping(image, selection) = &self.stage else {
            return self.fail(PipelineError::InvalidState {
                action: "apply a crop",
                state: self.state().as_str(),
            });
        };

        let (bytes, frame, selection) = (image.bytes.clone(), image.frame, *selection);
        match run_blocking(move || crop_to_data_uri(&bytes, &frame, selection)).await {
            Ok(uri) => {
                self.stage = Stage::Idle;
                self.error = None;
                Ok(self.committed.insert(uri).as_str())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Clear the field and notify the caller. The uploaded file stays in storage.
    pub fn remove(&mut self, on_remove: impl FnOnce()) {
        self.stage = Stage::Idle;
        self.committed = None;
        self.error = None;
        on_remove();
    }

    fn fail<T>(&mut self, err: PipelineError) -> Result<T, PipelineError> {
        self.error = Some(err.to_string());
        Err(err)
    }
}

/// Run CPU-bound image work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PipelineError::Worker(err.to_string()))?
}
