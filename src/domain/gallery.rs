//! Gallery image validation.

use branford_api_types::{GalleryImage, GalleryImageInput, GalleryImagePatch};

use super::error::ValidationError;
use super::fields::{optional, present, required};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryDraft {
    /// Upload path, remote URL or a `data:` URI from the crop step.
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryChanges {
    pub url: Option<String>,
    pub caption: Option<Option<String>>,
}

pub fn validate_gallery_image(input: GalleryImageInput) -> Result<GalleryDraft, ValidationError> {
    Ok(GalleryDraft {
        url: required(input.url, "url")?,
        caption: optional(input.caption),
    })
}

pub fn validate_gallery_patch(patch: GalleryImagePatch) -> Result<GalleryChanges, ValidationError> {
    Ok(GalleryChanges {
        url: present(patch.url, "url")?,
        caption: patch.caption.map(optional),
    })
}

impl GalleryChanges {
    pub fn apply(self, image: &mut GalleryImage) {
        if let Some(url) = self.url {
            image.url = url;
        }
        if let Some(caption) = self.caption {
            image.caption = caption;
        }
    }
}
