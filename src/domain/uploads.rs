//! Upload naming rules and accepted image types.

use std::path::Path;

use time::OffsetDateTime;
use uuid::Uuid;

const DEFAULT_EXTENSION: &str = "jpg";
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Render a YYYY-MM key for partitioning uploads by month.
pub fn month_key_for(timestamp: OffsetDateTime) -> String {
    let (year, month, _) = timestamp.date().to_calendar_date();
    format!("{year:04}-{:02}", month as u8)
}

/// Lower-cased image extension of the client file name; `jpg` for anything else.
///
/// Stored files are served with a type guessed from this extension, so only known
/// raster image extensions survive.
pub fn storage_extension(file_name: &str) -> String {
    image_extension(file_name).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Relative storage key: `{YYYY-MM}/{uuid}.{ext}`.
pub fn storage_key(file_name: &str, identifier: Uuid, now: OffsetDateTime) -> String {
    format!(
        "{}/{identifier}.{}",
        month_key_for(now),
        storage_extension(file_name)
    )
}

/// Accept a declared `image/*` type, or a known image extension when no type was sent.
pub fn is_accepted_image(content_type: Option<&str>, file_name: &str) -> bool {
    match content_type.map(str::trim).filter(|value| !value.is_empty()) {
        Some("application/octet-stream") | None => has_image_extension(file_name),
        Some(declared) => declared.to_ascii_lowercase().starts_with("image/"),
    }
}

fn has_image_extension(file_name: &str) -> bool {
    image_extension(file_name).is_some()
}

fn image_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .filter(|value| IMAGE_EXTENSIONS.contains(&value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn extension_is_lowercased_with_jpg_fallback() {
        assert_eq!(storage_extension("Squat.PNG"), "png");
        assert_eq!(storage_extension("photo"), "jpg");
        assert_eq!(storage_extension("weird.j p g"), "jpg");
        assert_eq!(storage_extension("Banner.WebP"), "webp");
    }

    #[test]
    fn non_image_extensions_are_never_stored() {
        for name in ["page.html", "logo.svg", "archive.tar.GZ", "script.js", "x.php"] {
            assert_eq!(storage_extension(name), "jpg", "{name}");
        }
    }

    #[test]
    fn keys_are_partitioned_by_month() {
        let id = Uuid::nil();
        let key = storage_key("coach.JPEG", id, datetime!(2024-03-09 17:45 UTC));
        assert_eq!(key, format!("2024-03/{id}.jpeg"));
    }

    #[test]
    fn image_types_are_recognised() {
        assert!(is_accepted_image(Some("image/webp"), "x.bin"));
        assert!(is_accepted_image(None, "x.gif"));
        assert!(is_accepted_image(Some("application/octet-stream"), "x.JPG"));
        assert!(!is_accepted_image(Some("application/pdf"), "x.png"));
        assert!(!is_accepted_image(None, "notes.txt"));
    }
}
