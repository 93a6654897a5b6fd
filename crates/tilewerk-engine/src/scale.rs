// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scale helpers — derive a scale factor from sizes, DPI or a target tile
// count, and predict the physical size of a print.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::{Result, TilerError};
use tilewerk_core::types::{POINTS_PER_INCH, PageSize};

use crate::geometry::calculate_single_page_preview;

/// Typical screen resolution.
pub const SCREEN_DPI: u32 = 72;
/// Typical office printer resolution.
pub const OFFICE_PRINT_DPI: u32 = 150;
/// Typical photo/print resolution.
pub const PRINT_DPI: u32 = 300;

/// A physical size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width_in: f32,
    pub height_in: f32,
}

impl std::fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × {:.2} inches", self.width_in, self.height_in)
    }
}

fn positive(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite() && *v > 0.0)
}

/// Scale that turns a print `original` long into one `desired` long.
pub fn scale_from_sizes(original: f32, desired: f32) -> Result<f32> {
    if !positive(&[original, desired]) {
        return Err(TilerError::InvalidMeasurement {
            width_in: original,
            height_in: desired,
        });
    }
    Ok(desired / original)
}

/// Largest scale that keeps an image printed at `dpi` within the desired
/// physical size on both axes.
pub fn scale_with_dpi(
    px_w: u32,
    px_h: u32,
    desired_w_in: f32,
    desired_h_in: f32,
    dpi: u32,
) -> Result<f32> {
    if !positive(&[desired_w_in, desired_h_in]) {
        return Err(TilerError::InvalidMeasurement {
            width_in: desired_w_in,
            height_in: desired_h_in,
        });
    }
    if px_w == 0 || px_h == 0 || dpi == 0 {
        return Err(TilerError::invalid_dimensions(px_w, px_h, 0.0, 0.0));
    }
    let current_w_in = px_w as f32 / dpi as f32;
    let current_h_in = px_h as f32 / dpi as f32;
    Ok((desired_w_in / current_w_in).min(desired_h_in / current_h_in))
}

/// Physical size of an image scaled by `scale` and printed at `target_dpi`.
pub fn expected_physical_size(px_w: u32, px_h: u32, scale: f32, target_dpi: u32) -> PhysicalSize {
    let scaled_w = (px_w as f32 * scale) as u32;
    let scaled_h = (px_h as f32 * scale) as u32;
    let dpi = target_dpi.max(1) as f32;
    PhysicalSize {
        width_in: scaled_w as f32 / dpi,
        height_in: scaled_h as f32 / dpi,
    }
}

/// Smallest scale at which the image covers at least `tiles_wide` x
/// `tiles_high` pages of `page`.
///
/// Like every scale in the crate, the result is relative to the single-page
/// baseline, so it can be passed straight to `calculate_scaled_tiling`.
pub fn scale_for_tile_count(
    px_w: u32,
    px_h: u32,
    tiles_wide: u32,
    tiles_high: u32,
    page: PageSize,
) -> Result<f32> {
    let invalid = || TilerError::invalid_dimensions(px_w, px_h, page.width, page.height);
    let image_w = i32::try_from(px_w).map_err(|_| invalid())?;
    let image_h = i32::try_from(px_h).map_err(|_| invalid())?;
    if tiles_wide == 0 || tiles_high == 0 {
        return Err(invalid());
    }

    let baseline = calculate_single_page_preview(image_w, image_h, page)?;
    let (base_w, base_h) = (baseline.image_width as f64, baseline.image_height as f64);
    // Whole-pixel targets, since scaled sizes are truncated.
    let target_w = (tiles_wide as f64 * page.width).ceil();
    let target_h = (tiles_high as f64 * page.height).ceil();

    let mut scale = (target_w / base_w).max(target_h / base_h) as f32;
    if !scale.is_finite() {
        return Err(TilerError::InvalidScale(scale));
    }
    // Step past f32 rounding until both truncated sides reach their target.
    while (base_w * scale as f64).floor() < target_w || (base_h * scale as f64).floor() < target_h {
        scale = f32::from_bits(scale.to_bits() + 1);
    }
    Ok(scale)
}

pub fn points_to_inches(points: f64) -> f32 {
    (points / POINTS_PER_INCH) as f32
}

pub fn inches_to_points(inches: f32) -> f64 {
    inches as f64 * POINTS_PER_INCH
}
