// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image — the decoded picture being tiled. Handles loading, lossless
// quarter-turn rotation, and a content fingerprint used as cache identity.
// Operates on in-memory images using the `image` crate.

use image::{DynamicImage, GenericImageView, ImageFormat};
use sha2::{Digest, Sha256};
use tilewerk_core::error::{Result, TilerError};
use tracing::{debug, info, instrument};

use crate::content::PixelSource;

/// The decoded image a tiling session works on.
///
/// The fingerprint identifies the pixels as loaded and is kept across
/// rotations; callers track rotation separately.
///
/// ```ignore
/// let mut source = SourceImage::open("poster.png")?;
/// source.rotate_clockwise();
/// println!("{} x {}", source.width(), source.height());
/// ```
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    fingerprint: String,
}

impl SourceImage {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            TilerError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self::from_dynamic(img))
    }

    /// Decode an image from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| TilerError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self::from_dynamic(img))
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let fingerprint = fingerprint(&image);
        Self { image, fingerprint }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// SHA-256 (hex) of the pixels as originally loaded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Turn the image 90 degrees clockwise (lossless; width and height swap).
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn rotate_clockwise(&mut self) {
        debug!("Rotating source 90 degrees");
        self.image = self.image.rotate90();
    }

    // -- Output ---------------------------------------------------------------

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

impl PixelSource for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(&self.image)
    }

    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }
}

/// Hash dimensions, colour layout and raw sample bytes.
fn fingerprint(image: &DynamicImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(format!("{:?}", image.color()).as_bytes());
    hasher.update(image.as_bytes());
    hex::encode(hasher.finalize())
}

/// Encode a `DynamicImage` as PNG, returning the raw bytes.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| TilerError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn marked_image() -> SourceImage {
        // 3 x 2 with a single red pixel at the top-left.
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        SourceImage::from_dynamic(DynamicImage::ImageRgba8(img))
    }

    #[test]
    fn rotation_swaps_dimensions_and_moves_pixels() {
        let mut rotated = marked_image();
        rotated.rotate_clockwise();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        // Top-left moves to top-right under a clockwise turn.
        assert_eq!(rotated.rgba(1, 0), [255, 0, 0, 255]);
        assert_eq!(rotated.rgba(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn fingerprint_survives_rotation_and_tracks_content() {
        let original = marked_image();
        let print = original.fingerprint().to_owned();
        assert_eq!(print.len(), 64);
        let mut rotated = original.clone();
        rotated.rotate_clockwise();
        assert_eq!(rotated.fingerprint(), print);

        let blank = SourceImage::from_dynamic(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            3,
            2,
            Rgba([255, 255, 255, 255]),
        )));
        assert_ne!(blank.fingerprint(), print);
    }

    #[test]
    fn png_bytes_decode_back() {
        let original = marked_image();
        let decoded = SourceImage::from_bytes(&original.to_png_bytes().unwrap()).unwrap();
        assert_eq!(decoded.fingerprint(), original.fingerprint());
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = SourceImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, TilerError::ImageError(_)));
    }
}
