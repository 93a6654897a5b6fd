// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content module — decides which tiles of a grid actually carry visible
// image content, so blank pages can be skipped.

pub mod analyzer;
pub mod pixels;

pub use analyzer::ContentAnalyzer;
pub use pixels::PixelSource;

use tilewerk_core::error::Result;
use tilewerk_core::types::{TileInfo, TileKey, TilingResult};

/// `ContentAnalyzer::tile_has_content` with the default thresholds.
pub fn tile_has_content(
    col: u32,
    row: u32,
    tiling: &TilingResult,
    pixels: Option<&dyn PixelSource>,
) -> Result<bool> {
    ContentAnalyzer::default().tile_has_content(TileKey::new(col, row), tiling, pixels)
}

/// `ContentAnalyzer::non_blank_tiles` with the default thresholds.
pub fn non_blank_tiles(tiling: &TilingResult, pixels: Option<&dyn PixelSource>) -> Vec<TileInfo> {
    ContentAnalyzer::default().non_blank_tiles(tiling, pixels)
}
