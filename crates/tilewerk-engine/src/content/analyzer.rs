// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blank-tile detection by sampled pixel inspection.

use tilewerk_core::AnalyzerConfig;
use tilewerk_core::error::Result;
use tilewerk_core::types::{TileInfo, TileKey, TileRect, TilingResult};
use tracing::{debug, instrument, trace};

use super::pixels::PixelSource;

/// Classifies tiles of a `TilingResult` as blank or carrying content.
///
/// Tile rectangles live in the scaled image space of the tiling; pixel
/// buffers are native resolution, so every rectangle is mapped back by the
/// ratio `native / scaled` before sampling. Sampling uses a fixed stride and
/// is fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct ContentAnalyzer {
    config: AnalyzerConfig,
}

/// Outcome of sampling one native-space region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionSample {
    sampled: u32,
    meaningful: u32,
}

impl ContentAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether the cell at `key` carries visible content.
    ///
    /// Without `pixels`, falls back to an area estimate: edge fragments at or
    /// below `min_area_fraction` of a full tile are blank.
    ///
    /// Fails with `OutOfBoundsTile` when `key` is outside the grid.
    pub fn tile_has_content(
        &self,
        key: TileKey,
        tiling: &TilingResult,
        pixels: Option<&dyn PixelSource>,
    ) -> Result<bool> {
        tiling.check_bounds(key)?;
        Ok(self.classify(key, tiling, pixels))
    }

    /// Every non-blank cell in row-major order, numbered per the grid.
    #[instrument(
        skip_all,
        fields(
            tiles_wide = tiling.tiles_wide,
            tiles_high = tiling.tiles_high,
            with_pixels = pixels.is_some()
        )
    )]
    pub fn non_blank_tiles(
        &self,
        tiling: &TilingResult,
        pixels: Option<&dyn PixelSource>,
    ) -> Vec<TileInfo> {
        let tiles: Vec<TileInfo> = tiling
            .keys()
            .filter(|&key| self.classify(key, tiling, pixels))
            .map(|key| TileInfo {
                col: key.col,
                row: key.row,
                tile_number: tiling.tile_number(key.col, key.row),
            })
            .collect();

        debug!(
            non_blank = tiles.len(),
            total = tiling.total_tiles(),
            "Content analysis complete"
        );
        tiles
    }

    /// Whether a single RGBA pixel counts towards content.
    ///
    /// Transparent, pure-white and near-white pixels are background.
    pub fn is_meaningful(&self, [r, g, b, a]: [u8; 4]) -> bool {
        let cfg = &self.config;
        let transparent = a < cfg.transparent_alpha;
        let pure_white = r >= cfg.pure_white && g >= cfg.pure_white && b >= cfg.pure_white;
        let near_white = r >= cfg.near_white && g >= cfg.near_white && b >= cfg.near_white;
        !transparent && !pure_white && !near_white
    }

    // -- Internals ------------------------------------------------------------

    fn classify(
        &self,
        key: TileKey,
        tiling: &TilingResult,
        pixels: Option<&dyn PixelSource>,
    ) -> bool {
        let rect = tiling.tile_rect(key);
        let intersects =
            rect.x0 < tiling.image_width as f64 && rect.y0 < tiling.image_height as f64;
        if rect.is_empty() || !intersects {
            return false;
        }

        match pixels {
            None => rect.area() / tiling.full_tile_area() > self.config.min_area_fraction,
            Some(pixels) => {
                let sample = self.sample_native(pixels, tiling, &rect);
                let has_content = sample.sampled > 0
                    && sample.meaningful as f64 / sample.sampled as f64 > self.config.content_ratio;
                trace!(
                    col = key.col,
                    row = key.row,
                    sampled = sample.sampled,
                    meaningful = sample.meaningful,
                    has_content,
                    "Tile sampled"
                );
                has_content
            }
        }
    }

    /// Map a scaled-space rectangle onto the native buffer and sample it.
    fn sample_native(
        &self,
        pixels: &dyn PixelSource,
        tiling: &TilingResult,
        rect: &TileRect,
    ) -> RegionSample {
        let (native_w, native_h) = pixels.dimensions();
        let scale_x = native_w as f64 / tiling.image_width as f64;
        let scale_y = native_h as f64 / tiling.image_height as f64;

        let x0 = ((rect.x0 * scale_x) as i64).max(0);
        let y0 = ((rect.y0 * scale_y) as i64).max(0);
        let x1 = ((rect.x1 * scale_x).min(native_w as f64) as i64).min(native_w as i64);
        let y1 = ((rect.y1 * scale_y).min(native_h as f64) as i64).min(native_h as i64);

        let empty = RegionSample {
            sampled: 0,
            meaningful: 0,
        };
        if x0 >= x1 || y0 >= y1 {
            return empty;
        }

        let region_w = (x1 - x0) as u32;
        let region_h = (y1 - y0) as u32;
        if region_w < self.config.min_region_px || region_h < self.config.min_region_px {
            return empty;
        }

        let step = (region_w.min(region_h) / self.config.sample_divisor.max(1)).max(1) as usize;
        let (x0, y0, x1, y1) = (x0 as u32, y0 as u32, x1 as u32, y1 as u32);

        let mut sample = empty;
        for y in (y0..y1).step_by(step) {
            for x in (x0..x1).step_by(step) {
                sample.sampled += 1;
                if self.is_meaningful(pixels.rgba(x, y)) {
                    sample.meaningful += 1;
                }
            }
        }
        sample
    }
}

// -- Tests --------------------------------------------------------------------
