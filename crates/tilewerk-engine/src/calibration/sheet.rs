// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calibration sheet — the reference page the user prints at scale 1.0 and
// measures with a ruler.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tilewerk_core::error::Result;
use tracing::{debug, instrument};

use super::calculator::CALIBRATION_IMAGE_SIZE;
use crate::image::source::encode_png;

/// Layout of the printable calibration sheet.
///
/// The default is a 3300 x 2550 white canvas with a centred black outline
/// 600 x 450 px (4.0 x 3.0 in at 150 DPI), 3 px thick. The outline's outer
/// edge is the measured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSheet {
    pub width: u32,
    pub height: u32,
    pub rect_width: u32,
    pub rect_height: u32,
    pub line_width: u32,
}

impl Default for CalibrationSheet {
    fn default() -> Self {
        let (width, height) = CALIBRATION_IMAGE_SIZE;
        Self {
            width,
            height,
            rect_width: 600,
            rect_height: 450,
            line_width: 3,
        }
    }
}

impl CalibrationSheet {
    /// Top-left corner of the outline's outer edge; `(0, 0)` on an axis
    /// where the rectangle is larger than the canvas.
    pub fn rect_origin(&self) -> (u32, u32) {
        (
            self.width.saturating_sub(self.rect_width) / 2,
            self.height.saturating_sub(self.rect_height) / 2,
        )
    }

    /// Draw the sheet.
    #[instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Rgba([255, 255, 255, 255]));
        let (x, y) = self.rect_origin();
        let black = Rgba([0, 0, 0, 255]);

        // Nested one-pixel outlines, stepping inwards.
        let thickness = self.line_width.min(self.rect_width / 2).min(self.rect_height / 2);
        for i in 0..thickness {
            let rect = Rect::at((x + i) as i32, (y + i) as i32)
                .of_size(self.rect_width - 2 * i, self.rect_height - 2 * i);
            draw_hollow_rect_mut(&mut canvas, rect, black);
        }

        debug!(rect_x = x, rect_y = y, thickness, "Calibration sheet rendered");
        canvas
    }

    /// Render and encode as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_png(&DynamicImage::ImageRgba8(self.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_matches_reference_layout() {
        let sheet = CalibrationSheet::default();
        let img = sheet.render();
        assert_eq!(img.dimensions(), (3300, 2550));
        assert_eq!(sheet.rect_origin(), (1350, 1050));

        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        // Outer corners of the outline.
        assert_eq!(*img.get_pixel(1350, 1050), black);
        assert_eq!(*img.get_pixel(1949, 1499), black);
        // Third pixel of the stroke, then the first inside it.
        assert_eq!(*img.get_pixel(1352, 1200), black);
        assert_eq!(*img.get_pixel(1353, 1200), white);
        // Just outside the outline and the centre stay white.
        assert_eq!(*img.get_pixel(1349, 1050), white);
        assert_eq!(*img.get_pixel(1950, 1499), white);
        assert_eq!(*img.get_pixel(1650, 1275), white);
    }

    #[test]
    fn oversized_rectangle_is_clipped_to_canvas() {
        let sheet = CalibrationSheet {
            width: 40,
            height: 30,
            rect_width: 60,
            rect_height: 45,
            line_width: 2,
        };
        assert_eq!(sheet.rect_origin(), (0, 0));
        let img = sheet.render();
        assert_eq!(img.dimensions(), (40, 30));
        // Only the top and left strokes land on the canvas.
        assert_eq!(*img.get_pixel(0, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(39, 29), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn png_encoding_round_trips_dimensions() {
        let sheet = CalibrationSheet {
            width: 120,
            height: 90,
            rect_width: 40,
            rect_height: 30,
            line_width: 2,
        };
        let bytes = sheet.to_png_bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 90));
    }
}
