// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tri-state tile selection — merges automatic blank detection with manual
// per-tile overrides into the final list of tiles to print or export.
//
// A tile with no override is Auto and follows content analysis. Toggling
// cycles Auto -> Excluded -> Included -> Auto. Overrides are addressed by
// (col, row) and are meaningless across a 90 degree rotation, so rotating
// the source image must clear them.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::Result;
use tilewerk_core::types::{TileInfo, TileKey, TilingResult};
use tracing::{debug, info};

use crate::content::{ContentAnalyzer, PixelSource};

/// Manual decision recorded for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileOverride {
    /// Never output, even if it has content.
    Excluded,
    /// Always output, even if it looks blank.
    Included,
}

/// Effective manual state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    /// No override; content analysis decides.
    Auto,
    Excluded,
    Included,
}

impl TileState {
    /// State after one toggle.
    pub fn next(self) -> Self {
        match self {
            Self::Auto => Self::Excluded,
            Self::Excluded => Self::Included,
            Self::Included => Self::Auto,
        }
    }
}

impl From<TileOverride> for TileState {
    fn from(value: TileOverride) -> Self {
        match value {
            TileOverride::Excluded => Self::Excluded,
            TileOverride::Included => Self::Included,
        }
    }
}

/// Per-tile override map, in insertion order.
///
/// Owned by a single interactive session and mutated only by explicit user
/// actions. Changing an existing override keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionModel {
    overrides: Vec<(TileKey, TileOverride)>,
}

/// Page counts for a merged selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Cells in the grid, blank or not.
    pub grid_tiles: u32,
    /// Cells content analysis considers non-blank.
    pub non_blank: u32,
    /// Tiles that will be output.
    pub pages_to_print: u32,
    /// Grid cells that will not be output.
    pub paper_saved: u32,
    /// Non-blank tiles the user excluded.
    pub manually_excluded: u32,
    /// Blank tiles the user forced in.
    pub manually_included: u32,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: TileKey) -> TileState {
        self.position(key)
            .map(|idx| self.overrides[idx].1.into())
            .unwrap_or(TileState::Auto)
    }

    /// Advance the tile at `key` one step through the three-state cycle.
    ///
    /// Fails with `OutOfBoundsTile` (leaving the map untouched) when `key` is
    /// not a cell of `tiling`.
    pub fn toggle(&mut self, key: TileKey, tiling: &TilingResult) -> Result<TileState> {
        tiling.check_bounds(key)?;
        let next = self.state(key).next();
        self.apply(key, next);
        debug!(%key, state = ?next, "Tile toggled");
        Ok(next)
    }

    /// Put the tile at `key` directly into `state`.
    pub fn set_state(&mut self, key: TileKey, tiling: &TilingResult, state: TileState) -> Result<()> {
        tiling.check_bounds(key)?;
        self.apply(key, state);
        Ok(())
    }

    /// Drop every override, returning all tiles to Auto.
    pub fn clear(&mut self) {
        if !self.overrides.is_empty() {
            info!(cleared = self.overrides.len(), "Clearing tile overrides");
        }
        self.overrides.clear();
    }

    /// Must be called whenever the source image is rotated: tile addresses
    /// do not survive transposing the grid.
    pub fn invalidate_for_rotation(&mut self) {
        info!("Source rotated, tile overrides invalidated");
        self.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Overrides in insertion order.
    pub fn overrides(&self) -> impl Iterator<Item = (TileKey, TileOverride)> + '_ {
        self.overrides.iter().copied()
    }

    /// Merge overrides into a precomputed non-blank list.
    ///
    /// Non-blank tiles that are not Excluded keep their row-major order;
    /// Included tiles missing from that list are appended in override order.
    /// Included keys outside the current grid are skipped.
    pub fn merge(&self, tiling: &TilingResult, non_blank: &[TileInfo]) -> Vec<TileInfo> {
        let mut selected: Vec<TileInfo> = non_blank
            .iter()
            .filter(|tile| self.state(tile.key()) != TileState::Excluded)
            .copied()
            .collect();

        for (key, value) in self.overrides() {
            if value != TileOverride::Included || selected.iter().any(|t| t.key() == key) {
                continue;
            }
            match tiling.tile_info(key) {
                Ok(tile) => selected.push(tile),
                Err(_) => debug!(%key, "Included override outside current grid, skipped"),
            }
        }
        selected
    }

    /// Analyse `tiling` and merge the overrides into the result.
    pub fn final_selection(
        &self,
        analyzer: &ContentAnalyzer,
        tiling: &TilingResult,
        pixels: Option<&dyn PixelSource>,
    ) -> Vec<TileInfo> {
        let non_blank = analyzer.non_blank_tiles(tiling, pixels);
        self.merge(tiling, &non_blank)
    }

    /// Page counts for a merge of `non_blank` with these overrides.
    pub fn summary(&self, tiling: &TilingResult, non_blank: &[TileInfo]) -> SelectionSummary {
        let selected = self.merge(tiling, non_blank);
        let manually_excluded = non_blank
            .iter()
            .filter(|t| self.state(t.key()) == TileState::Excluded)
            .count() as u32;
        let manually_included = selected
            .iter()
            .filter(|t| !non_blank.iter().any(|nb| nb.key() == t.key()))
            .count() as u32;
        let grid_tiles = tiling.total_tiles();
        let pages_to_print = selected.len() as u32;

        SelectionSummary {
            grid_tiles,
            non_blank: non_blank.len() as u32,
            pages_to_print,
            paper_saved: grid_tiles.saturating_sub(pages_to_print),
            manually_excluded,
            manually_included,
        }
    }

    // -- Internals ------------------------------------------------------------

    fn position(&self, key: TileKey) -> Option<usize> {
        self.overrides.iter().position(|(k, _)| *k == key)
    }

    fn apply(&mut self, key: TileKey, state: TileState) {
        let value = match state {
            TileState::Auto => {
                if let Some(idx) = self.position(key) {
                    self.overrides.remove(idx);
                }
                return;
            }
            TileState::Excluded => TileOverride::Excluded,
            TileState::Included => TileOverride::Included,
        };
        match self.position(key) {
            Some(idx) => self.overrides[idx].1 = value,
            None => self.overrides.push((key, value)),
        }
    }
}

/// Analyse with default thresholds and merge `overrides`.
pub fn final_selection(
    tiling: &TilingResult,
    pixels: Option<&dyn PixelSource>,
    overrides: &SelectionModel,
) -> Vec<TileInfo> {
    overrides.final_selection(&ContentAnalyzer::default(), tiling, pixels)
}

/// Re-sort a selection into strict page order (row-major tile number).
pub fn into_page_order(mut tiles: Vec<TileInfo>) -> Vec<TileInfo> {
    tiles.sort_by_key(|t| t.tile_number);
    tiles
}

// -- Tests --------------------------------------------------------------------
