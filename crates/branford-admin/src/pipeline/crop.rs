//! Square crop selection and export.
//!
//! Selections live in display coordinates: the size the image is shown at while the
//! user drags the handles. Export maps them back to natural pixels with a single
//! scale factor, `min(natural_w / display_w, natural_h / display_h)`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::compress::encode_jpeg;
use super::{CROP_CAP, MIN_IMAGE_SIDE, MIN_SELECTION, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Natural and displayed size of the image being cropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropFrame {
    natural: (u32, u32),
    display: (u32, u32),
}

impl CropFrame {
    /// A frame shown at its natural size.
    pub fn natural(width: u32, height: u32) -> Self {
        Self {
            natural: (width, height),
            display: (width, height),
        }
    }

    pub fn displayed(natural: (u32, u32), display: (u32, u32)) -> Self {
        Self {
            natural,
            display: (display.0.max(1), display.1.max(1)),
        }
    }

    /// Read the natural size from encoded bytes without decoding pixels.
    pub fn measure(bytes: &[u8]) -> Result<Self, PipelineError> {
        let size = imagesize::blob_size(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
        let width = u32::try_from(size.width).map_err(|e| PipelineError::Decode(e.to_string()))?;
        let height =
            u32::try_from(size.height).map_err(|e| PipelineError::Decode(e.to_string()))?;
        Ok(Self::natural(width, height))
    }

    pub fn natural_size(&self) -> (u32, u32) {
        self.natural
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display
    }

    pub fn scale(&self) -> f64 {
        let sx = f64::from(self.natural.0) / f64::from(self.display.0);
        let sy = f64::from(self.natural.1) / f64::from(self.display.1);
        sx.min(sy)
    }

    /// Centred square of `min(width, height, CROP_CAP)`; refuses images under the minimum.
    pub fn default_selection(&self) -> Result<Selection, PipelineError> {
        let (width, height) = self.display;
        if width < MIN_IMAGE_SIDE || height < MIN_IMAGE_SIDE {
            return Err(PipelineError::ImageTooSmall {
                width,
                height,
                min: MIN_IMAGE_SIDE,
            });
        }

        let size = width.min(height).min(CROP_CAP);
        Ok(Selection {
            x: (width - size) / 2,
            y: (height - size) / 2,
            width: size,
            height: size,
        })
    }

    /// Square the selection on its longer edge, bounded by [`MIN_SELECTION`], [`CROP_CAP`]
    /// and the shorter image edge, then move it inside the image.
    pub fn clamp(&self, selection: Selection) -> Selection {
        let (max_w, max_h) = self.display;
        let side = selection
            .width
            .max(selection.height)
            .max(MIN_SELECTION)
            .min(CROP_CAP)
            .min(max_w.min(max_h));
        Selection {
            x: selection.x.min(max_w - side),
            y: selection.y.min(max_h - side),
            width: side,
            height: side,
        }
    }

    /// Natural-pixel rectangle for a display selection. Its size is the output size.
    pub fn source_rect(&self, selection: Selection) -> Selection {
        let scale = self.scale();
        let (nat_w, nat_h) = self.natural;
        let x = scaled(selection.x, scale).min(nat_w.saturating_sub(1));
        let y = scaled(selection.y, scale).min(nat_h.saturating_sub(1));
        Selection {
            x,
            y,
            width: scaled(selection.width, scale).clamp(1, nat_w - x),
            height: scaled(selection.height, scale).clamp(1, nat_h - y),
        }
    }
}

fn scaled(value: u32, scale: f64) -> u32 {
    (f64::from(value) * scale).floor() as u32
}

/// Cut the selection out of `bytes` and return it as a JPEG data URI.
pub fn crop_to_data_uri(
    bytes: &[u8],
    frame: &CropFrame,
    selection: Selection,
) -> Result<String, PipelineError> {
    let image = image::load_from_memory(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
    let frame = CropFrame {
        natural: (image.width(), image.height()),
        display: frame.display,
    };
    let rect = frame.source_rect(frame.clamp(selection));
    let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let jpeg = encode_jpeg(&cropped)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}
