//! Downscale and re-encode large images before upload.

use std::io::Cursor;

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use super::intake::SelectedFile;
use super::{COMPRESS_THRESHOLD_BYTES, JPEG_QUALITY, MAX_DIMENSION, PipelineError};

/// Clamp the longest edge to `max_dim`, keeping the aspect ratio. Never upscales.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    if width <= max_dim && height <= max_dim {
        return (width, height);
    }
    if width > height {
        let new_height = (f64::from(height) * f64::from(max_dim) / f64::from(width)).round();
        (max_dim, (new_height as u32).max(1))
    } else {
        let new_width = (f64::from(width) * f64::from(max_dim) / f64::from(height)).round();
        ((new_width as u32).max(1), max_dim)
    }
}

/// Files at or under the threshold pass through untouched.
pub fn compress(file: SelectedFile) -> Result<SelectedFile, PipelineError> {
    if file.bytes.len() <= COMPRESS_THRESHOLD_BYTES {
        return Ok(file);
    }

    let image =
        image::load_from_memory(&file.bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;
    let (width, height) = fit_within(image.width(), image.height(), MAX_DIMENSION);
    let resized = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Lanczos3)
    };

    Ok(SelectedFile::new(
        jpeg_name(&file.name),
        "image/jpeg",
        encode_jpeg(&resized)?,
    ))
}

/// Encode as JPEG at [`JPEG_QUALITY`], dropping any alpha channel.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, PipelineError> {
    let mut out = Cursor::new(Vec::new());
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

fn jpeg_name(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    format!("{stem}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn noisy_png(width: u32, height: u32) -> Vec<u8> {
        let mut seed: u32 = 0x9e37_79b9;
        let img = RgbImage::from_fn(width, height, |_, _| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgb([r, g, b])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("png encodes");
        out.into_inner()
    }

    #[test]
    fn wide_images_clamp_width_and_round_height() {
        assert_eq!(fit_within(4000, 3000, 1600), (1600, 1200));
        assert_eq!(fit_within(3000, 1999, 1600), (1600, 1066));
        assert_eq!(fit_within(2001, 1000, 1600), (1600, 800));
    }

    #[test]
    fn tall_and_square_images_clamp_height() {
        assert_eq!(fit_within(1000, 2001, 1600), (800, 1600));
        assert_eq!(fit_within(2000, 2000, 1600), (1600, 1600));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(fit_within(1600, 900, 1600), (1600, 900));
        assert_eq!(fit_within(10, 10, 1600), (10, 10));
        assert_eq!(fit_within(100_000, 1, 1600), (1600, 1));
    }

    #[test]
    fn small_files_bypass_compression() {
        let file = SelectedFile::new("a.png", "image/png", vec![1, 2, 3]);
        assert_eq!(compress(file.clone()).expect("passes"), file);
    }

    #[test]
    fn large_files_are_resized_and_reencoded_as_jpeg() {
        let bytes = noisy_png(2000, 1000);
        assert!(bytes.len() > COMPRESS_THRESHOLD_BYTES);

        let out = compress(SelectedFile::new("wide.png", "image/png", bytes)).expect("compressed");
        assert_eq!(out.name, "wide.jpg");
        assert_eq!(out.content_type, "image/jpeg");

        let decoded = image::load_from_memory(&out.bytes).expect("jpeg decodes");
        assert_eq!((decoded.width(), decoded.height()), (1600, 800));
    }

    #[test]
    fn undecodable_large_files_fail() {
        let file = SelectedFile::new("x.png", "image/png", vec![7; COMPRESS_THRESHOLD_BYTES + 1]);
        assert!(matches!(compress(file), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn jpeg_names_replace_the_extension() {
        assert_eq!(jpeg_name("squat.PNG"), "squat.jpg");
        assert_eq!(jpeg_name("photo"), "photo.jpg");
        assert_eq!(jpeg_name(".hidden"), ".hidden.jpg");
    }
}
