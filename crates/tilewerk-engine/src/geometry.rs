// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tiling geometry — choose the page orientation and tile grid for an image
// at a given scale.
//
// Image and page sizes share one unit: a scaled image pixel is one point on
// paper. Scaling is always relative to the single-page baseline, so a scale
// of 2.0 means "twice the size that fits one page" regardless of the source
// resolution.

use tilewerk_core::error::{Result, TilerError};
use tilewerk_core::types::{Orientation, PageSize, TilingResult};
use tracing::{debug, instrument};

/// Grid that covers `image_w` x `image_h` with the fewest pages.
///
/// Both page orientations are tried; landscape wins only when its total page
/// count is strictly smaller, so ties resolve to portrait.
#[instrument(level = "debug", fields(page_w = page.width, page_h = page.height))]
pub fn calculate_optimal_tiling(image_w: i32, image_h: i32, page: PageSize) -> Result<TilingResult> {
    validate(image_w, image_h, page)?;

    let portrait = grid_for(image_w, image_h, page, Orientation::Portrait);
    let landscape = grid_for(image_w, image_h, page.rotated(), Orientation::Landscape);

    let portrait_pages = page_count(&portrait);
    let landscape_pages = page_count(&landscape);
    debug!(portrait_pages, landscape_pages, "Orientation candidates");

    let best = if landscape_pages < portrait_pages {
        landscape
    } else {
        portrait
    };
    // Page counts and tile numbers are u32.
    if page_count(&best) >= u64::from(u32::MAX) {
        return Err(TilerError::invalid_dimensions(
            image_w,
            image_h,
            page.width,
            page.height,
        ));
    }
    Ok(best)
}

/// Fit the whole image on one page, in whichever orientation lets it be
/// larger (portrait on a tie).
///
/// The returned `image_width`/`image_height` are the scaled dimensions at the
/// fit scale, truncated to whole pixels but never below one. They are the
/// baseline every further scale multiplies.
#[instrument(level = "debug", fields(page_w = page.width, page_h = page.height))]
pub fn calculate_single_page_preview(
    image_w: i32,
    image_h: i32,
    page: PageSize,
) -> Result<TilingResult> {
    validate(image_w, image_h, page)?;

    let (w, h) = (image_w as f64, image_h as f64);
    let fit_portrait = (page.width / w).min(page.height / h);
    let fit_landscape = (page.height / w).min(page.width / h);

    let (fit, tile, orientation) = if fit_landscape > fit_portrait {
        (fit_landscape, page.rotated(), Orientation::Landscape)
    } else {
        (fit_portrait, page, Orientation::Portrait)
    };

    debug!(fit, ?orientation, "Single-page fit");

    Ok(TilingResult {
        tiles_wide: 1,
        tiles_high: 1,
        tile_width: tile.width,
        tile_height: tile.height,
        image_width: ((w * fit) as i32).max(1),
        image_height: ((h * fit) as i32).max(1),
        orientation,
    })
}

/// Tile grid for the image enlarged `scale` times past its single-page fit.
///
/// A scale of 1.0 reproduces the single-page preview grid. A scale whose
/// working size does not fit in `i32` is rejected with `InvalidScale`.
#[instrument(level = "debug", fields(page_w = page.width, page_h = page.height))]
pub fn calculate_scaled_tiling(
    orig_w: i32,
    orig_h: i32,
    page: PageSize,
    scale: f32,
) -> Result<TilingResult> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(TilerError::InvalidScale(scale));
    }

    let baseline = calculate_single_page_preview(orig_w, orig_h, page)?;
    let scaled_w = scaled_dimension(baseline.image_width, scale)?;
    let scaled_h = scaled_dimension(baseline.image_height, scale)?;

    debug!(
        baseline_w = baseline.image_width,
        baseline_h = baseline.image_height,
        scaled_w,
        scaled_h,
        "Scaled working size"
    );

    calculate_optimal_tiling(scaled_w, scaled_h, page)
}

fn validate(image_w: i32, image_h: i32, page: PageSize) -> Result<()> {
    let page_ok = page.width.is_finite() && page.height.is_finite();
    if image_w <= 0 || image_h <= 0 || !page_ok || page.width <= 0.0 || page.height <= 0.0 {
        return Err(TilerError::invalid_dimensions(
            image_w,
            image_h,
            page.width,
            page.height,
        ));
    }
    Ok(())
}

fn scaled_dimension(baseline: i32, scale: f32) -> Result<i32> {
    let scaled = baseline as f64 * scale as f64;
    if scaled > i32::MAX as f64 {
        return Err(TilerError::InvalidScale(scale));
    }
    Ok((scaled as i32).max(1))
}

fn page_count(tiling: &TilingResult) -> u64 {
    u64::from(tiling.tiles_wide) * u64::from(tiling.tiles_high)
}

fn grid_for(image_w: i32, image_h: i32, tile: PageSize, orientation: Orientation) -> TilingResult {
    TilingResult {
        tiles_wide: (image_w as f64 / tile.width).ceil() as u32,
        tiles_high: (image_h as f64 / tile.height).ceil() as u32,
        tile_width: tile.width,
        tile_height: tile.height,
        image_width: image_w,
        image_height: image_h,
        orientation,
    }
}

// -- Tests --------------------------------------------------------------------
