// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Tilewerk tiling engine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, TilerError};

/// Points per inch (PostScript/PDF unit).
pub const POINTS_PER_INCH: f64 = 72.0;

/// Zero-based address of one cell in a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    pub col: u32,
    pub row: u32,
}

impl TileKey {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for TileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

impl FromStr for TileKey {
    type Err = TilerError;

    /// Parse the `"col,row"` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TilerError::InvalidTileKey(s.to_owned());
        let (col, row) = s.split_once(',').ok_or_else(invalid)?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        Ok(Self { col, row })
    }
}

/// One tile selected for output, numbered in row-major order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileInfo {
    pub col: u32,
    pub row: u32,
    pub tile_number: u32,
}

impl TileInfo {
    pub fn key(&self) -> TileKey {
        TileKey::new(self.col, self.row)
    }
}

/// Page orientation chosen for a tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Axis-aligned rectangle in the scaled image coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TileRect {
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Shape of a tile grid laid over a (possibly scaled) image.
///
/// `tile_width`/`tile_height` are always one of the two physical page
/// orientations; `image_width`/`image_height` are post-scale pixel sizes in
/// the same unit as the page (one pixel per point).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilingResult {
    pub tiles_wide: u32,
    pub tiles_high: u32,
    pub tile_width: f64,
    pub tile_height: f64,
    pub image_width: i32,
    pub image_height: i32,
    pub orientation: Orientation,
}

impl TilingResult {
    /// Number of cells in the grid, blank or not.
    pub fn total_tiles(&self) -> u32 {
        self.tiles_wide.saturating_mul(self.tiles_high)
    }

    /// Row-major, one-based tile number for a cell.
    pub fn tile_number(&self, col: u32, row: u32) -> u32 {
        row * self.tiles_wide + col + 1
    }

    pub fn contains(&self, key: TileKey) -> bool {
        key.col < self.tiles_wide && key.row < self.tiles_high
    }

    /// Fail with `OutOfBoundsTile` unless `key` addresses a cell of this grid.
    pub fn check_bounds(&self, key: TileKey) -> Result<()> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(TilerError::OutOfBoundsTile {
                col: key.col,
                row: key.row,
                tiles_wide: self.tiles_wide,
                tiles_high: self.tiles_high,
            })
        }
    }

    /// Build the `TileInfo` for an in-bounds cell.
    pub fn tile_info(&self, key: TileKey) -> Result<TileInfo> {
        self.check_bounds(key)?;
        Ok(TileInfo {
            col: key.col,
            row: key.row,
            tile_number: self.tile_number(key.col, key.row),
        })
    }

    /// Nominal rectangle of a cell, clamped to the image bounds.
    ///
    /// The start edge is not clamped, so a cell lying wholly past the image
    /// yields an empty rectangle.
    pub fn tile_rect(&self, key: TileKey) -> TileRect {
        let x0 = key.col as f64 * self.tile_width;
        let y0 = key.row as f64 * self.tile_height;
        TileRect {
            x0,
            y0,
            x1: ((key.col + 1) as f64 * self.tile_width).min(self.image_width as f64),
            y1: ((key.row + 1) as f64 * self.tile_height).min(self.image_height as f64),
        }
    }

    /// Area of one full, unclamped tile.
    pub fn full_tile_area(&self) -> f64 {
        self.tile_width * self.tile_height
    }

    /// Iterate every cell key in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        (0..self.tiles_high)
            .flat_map(move |row| (0..self.tiles_wide).map(move |col| TileKey::new(col, row)))
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    Letter,
    Legal,
    Tabloid,
    Custom { width_in: f64, height_in: f64 },
}

impl PaperSize {
    /// Portrait dimensions in inches (width, height).
    pub fn dimensions_inches(&self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::A3 => (11.69, 16.54),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
            Self::Custom {
                width_in,
                height_in,
            } => (*width_in, *height_in),
        }
    }

    /// Portrait dimensions in points (width, height).
    pub fn dimensions_points(&self) -> (f64, f64) {
        let (w, h) = self.dimensions_inches();
        (w * POINTS_PER_INCH, h * POINTS_PER_INCH)
    }

    /// Portrait page in points.
    pub fn page_size(&self) -> PageSize {
        let (width, height) = self.dimensions_points();
        PageSize { width, height }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::A4 => "A4 (210 × 297 mm)".into(),
            Self::A3 => "A3 (297 × 420 mm)".into(),
            Self::Letter => "Letter (8.5\" × 11\")".into(),
            Self::Legal => "Legal (8.5\" × 14\")".into(),
            Self::Tabloid => "Tabloid (11\" × 17\")".into(),
            Self::Custom {
                width_in,
                height_in,
            } => format!("Custom ({width_in}\" × {height_in}\")"),
        }
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" => Ok(Self::Tabloid),
            other => Err(format!(
                "unknown paper size {other:?} (expected a4, a3, letter, legal or tabloid)"
            )),
        }
    }
}

/// Physical page dimensions in points, portrait orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same page turned 90 degrees.
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl From<PaperSize> for PageSize {
    fn from(paper: PaperSize) -> Self {
        paper.page_size()
    }
}

/// Clockwise rotation of the source image in quarter turns (0..=3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation(u8);

impl Rotation {
    pub fn from_quarter_turns(turns: u32) -> Self {
        Self((turns % 4) as u8)
    }

    /// Rotation after one more clockwise quarter turn.
    pub fn clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    pub fn quarter_turns(&self) -> u8 {
        self.0
    }

    pub fn degrees(&self) -> u32 {
        self.0 as u32 * 90
    }

    /// Whether width and height are swapped relative to the source.
    pub fn is_transposed(&self) -> bool {
        self.0 % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(tiles_wide: u32, tiles_high: u32) -> TilingResult {
        TilingResult {
            tiles_wide,
            tiles_high,
            tile_width: 100.0,
            tile_height: 200.0,
            image_width: 250,
            image_height: 300,
            orientation: Orientation::Portrait,
        }
    }

    #[test]
    fn tile_number_is_row_major_one_based() {
        let t = grid(3, 2);
        assert_eq!(t.tile_number(0, 0), 1);
        assert_eq!(t.tile_number(2, 0), 3);
        assert_eq!(t.tile_number(0, 1), 4);
        assert_eq!(t.tile_number(2, 1), 6);
    }

    #[test]
    fn total_tiles_saturates_on_oversized_grids() {
        assert_eq!(grid(3, 2).total_tiles(), 6);
        assert_eq!(grid(u32::MAX, 2).total_tiles(), u32::MAX);
    }

    #[test]
    fn check_bounds_rejects_outside_cells() {
        let t = grid(3, 2);
        assert!(t.check_bounds(TileKey::new(2, 1)).is_ok());
        assert!(matches!(
            t.check_bounds(TileKey::new(3, 0)),
            Err(TilerError::OutOfBoundsTile { col: 3, row: 0, .. })
        ));
        assert!(t.check_bounds(TileKey::new(0, 2)).is_err());
    }

    #[test]
    fn tile_rect_clamps_to_image() {
        let t = grid(3, 2);
        let rect = t.tile_rect(TileKey::new(2, 1));
        assert_eq!(rect.x0, 200.0);
        assert_eq!(rect.x1, 250.0);
        assert_eq!(rect.y0, 200.0);
        assert_eq!(rect.y1, 300.0);
        assert_eq!(rect.area(), 5000.0);
    }

    #[test]
    fn keys_iterate_row_major() {
        let keys: Vec<_> = grid(2, 2).keys().collect();
        assert_eq!(
            keys,
            vec![
                TileKey::new(0, 0),
                TileKey::new(1, 0),
                TileKey::new(0, 1),
                TileKey::new(1, 1)
            ]
        );
    }

    #[test]
    fn tile_key_parses_display_form() {
        let key: TileKey = "3, 7".parse().unwrap();
        assert_eq!(key, TileKey::new(3, 7));
        assert_eq!(key.to_string(), "3,7");
        assert!(matches!(
            "3;7".parse::<TileKey>(),
            Err(TilerError::InvalidTileKey(_))
        ));
        assert!("a,1".parse::<TileKey>().is_err());
    }

    #[test]
    fn a4_points_match_reference() {
        let (w, h) = PaperSize::A4.dimensions_points();
        assert!((w - 595.44).abs() < 1e-9);
        assert!((h - 841.68).abs() < 1e-9);
    }

    #[test]
    fn rotation_wraps_after_four_turns() {
        let mut r = Rotation::default();
        for _ in 0..4 {
            r = r.clockwise();
        }
        assert_eq!(r, Rotation::default());
        assert!(Rotation::from_quarter_turns(3).is_transposed());
        assert_eq!(Rotation::from_quarter_turns(6).degrees(), 180);
    }
}
