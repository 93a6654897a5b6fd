// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only RGBA pixel access for content analysis.

use image::{DynamicImage, GenericImageView, RgbaImage};

/// A decoded image the analyzer can sample, in native pixel coordinates.
pub trait PixelSource {
    /// Native (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// RGBA value at `(x, y)`. Callers stay within `dimensions()`.
    fn rgba(&self, x: u32, y: u32) -> [u8; 4];
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}
