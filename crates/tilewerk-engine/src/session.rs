// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tiling session — owns one source image and the user's choices about it
// (scale, paper, rotation, manual overrides) and memoizes the expensive
// pixel analysis so repeated queries with unchanged inputs are free.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::{Result, TilerError};
use tilewerk_core::types::{PageSize, PaperSize, Rotation, TileInfo, TileKey, TilingResult};
use tilewerk_core::{AnalyzerConfig, CalibrationConfig, TilerConfig};
use tracing::{debug, info, instrument};

use crate::calibration::{
    CalibrationMeasurement, CalibrationReport, CalibrationSheet, is_calibration_image,
};
use crate::content::ContentAnalyzer;
use crate::geometry::{calculate_scaled_tiling, calculate_single_page_preview};
use crate::image::SourceImage;
use crate::scale::{PhysicalSize, points_to_inches};
use crate::selection::{SelectionModel, SelectionSummary, TileOverride, TileState, into_page_order};

/// Inputs that determine a tiling and its blank-tile analysis.
///
/// Floats are compared by bit pattern so equal inputs always hit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    scale_bits: u32,
    rotation_epoch: u64,
    fingerprint: String,
    page_width_bits: u64,
    page_height_bits: u64,
}

#[derive(Debug, Clone)]
struct CachedAnalysis {
    key: CacheKey,
    tiling: TilingResult,
    non_blank: Vec<TileInfo>,
}

/// Serializable description of what will be printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlan {
    pub paper: String,
    pub page_size_in: PhysicalSize,
    pub scale: f32,
    pub rotation_degrees: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub tiling: TilingResult,
    pub tiles: Vec<TileInfo>,
    pub overrides: Vec<(TileKey, TileOverride)>,
    pub summary: SelectionSummary,
}

/// One interactive tiling session over a single image.
///
/// ```ignore
/// let mut session = TilingSession::open("poster.png", &TilerConfig::default())?;
/// session.set_scale(2.0)?;
/// session.toggle_tile(TileKey::new(0, 0))?;
/// for tile in session.final_selection()? {
///     println!("page {} = ({}, {})", tile.tile_number, tile.col, tile.row);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TilingSession {
    source: SourceImage,
    rotation: Rotation,
    rotation_epoch: u64,
    scale: f32,
    paper_size: PaperSize,
    analyzer: ContentAnalyzer,
    calibration: CalibrationConfig,
    selection: SelectionModel,
    cache: Option<CachedAnalysis>,
    analysis_runs: u64,
}

impl TilingSession {
    // -- Construction ---------------------------------------------------------

    /// Start a session over `source` using the paper, scale and thresholds
    /// from `config`.
    pub fn new(source: SourceImage, config: &TilerConfig) -> Result<Self> {
        let mut session = Self {
            source,
            rotation: Rotation::default(),
            rotation_epoch: 0,
            scale: 1.0,
            paper_size: config.paper_size,
            analyzer: ContentAnalyzer::new(config.analyzer.clone()),
            calibration: config.calibration.clone(),
            selection: SelectionModel::new(),
            cache: None,
            analysis_runs: 0,
        };
        session.set_scale(config.default_scale)?;
        Ok(session)
    }

    /// Load the image at `path` and start a session over it.
    pub fn open(path: impl AsRef<std::path::Path>, config: &TilerConfig) -> Result<Self> {
        let source = SourceImage::open(path)?;
        Self::new(source, config)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    pub fn page_size(&self) -> PageSize {
        self.paper_size.page_size()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn analyzer_config(&self) -> &AnalyzerConfig {
        self.analyzer.config()
    }

    /// How many times the pixel analysis has actually run.
    pub fn analysis_runs(&self) -> u64 {
        self.analysis_runs
    }

    // -- Settings -------------------------------------------------------------

    /// Change the enlargement factor. Overrides are kept; any that fall
    /// outside the new grid are ignored until they fit again.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TilerError::InvalidScale(scale));
        }
        if scale != self.scale {
            debug!(from = self.scale, to = scale, "Scale changed");
        }
        self.scale = scale;
        Ok(())
    }

    pub fn set_paper_size(&mut self, paper: PaperSize) {
        if paper != self.paper_size {
            debug!(paper = %paper.display_name(), "Paper size changed");
        }
        self.paper_size = paper;
    }

    /// Turn the image 90 degrees clockwise.
    ///
    /// Every manual override is cleared: tile coordinates do not survive a
    /// rotation.
    #[instrument(skip(self), fields(degrees = self.rotation.degrees()))]
    pub fn rotate_clockwise(&mut self) {
        self.source.rotate_clockwise();
        self.rotation = self.rotation.clockwise();
        self.rotation_epoch += 1;
        self.selection.invalidate_for_rotation();
        info!(degrees = self.rotation.degrees(), "Image rotated");
    }

    /// Measure the printed calibration rectangle and adopt the corrective
    /// scale it implies, replacing the current scale.
    ///
    /// The printer DPI is estimated from the pixel size of what was
    /// measured: the reference rectangle when the session holds the
    /// calibration sheet, otherwise the single-page print of the image.
    pub fn apply_calibration(
        &mut self,
        measured_width_in: f32,
        measured_height_in: f32,
    ) -> Result<CalibrationReport> {
        let measurement = CalibrationMeasurement::with_reference(
            measured_width_in,
            measured_height_in,
            &self.calibration,
        );
        let report = CalibrationReport::new(measurement, self.measured_pixels()?)?;
        info!(
            replaced_scale = self.scale,
            calibrated_scale = report.calibrated_scale,
            "Calibrated scale replaces the current scale"
        );
        self.set_scale(report.calibrated_scale)?;
        Ok(report)
    }

    // -- Analysis -------------------------------------------------------------

    /// Grid for the current image, paper and scale.
    pub fn tiling(&mut self) -> Result<TilingResult> {
        Ok(self.analysis()?.0)
    }

    /// Non-blank tiles of the current grid, in row-major order.
    pub fn non_blank_tiles(&mut self) -> Result<Vec<TileInfo>> {
        Ok(self.analysis()?.1)
    }

    // -- Selection ------------------------------------------------------------

    pub fn tile_state(&self, key: TileKey) -> TileState {
        self.selection.state(key)
    }

    /// Advance one tile through Auto -> Excluded -> Included -> Auto.
    pub fn toggle_tile(&mut self, key: TileKey) -> Result<TileState> {
        let tiling = self.tiling()?;
        self.selection.toggle(key, &tiling)
    }

    pub fn set_tile_state(&mut self, key: TileKey, state: TileState) -> Result<()> {
        let tiling = self.tiling()?;
        self.selection.set_state(key, &tiling, state)
    }

    pub fn clear_overrides(&mut self) {
        self.selection.clear();
    }

    /// Tiles to output: surviving non-blank tiles in row-major order, then
    /// forced inclusions in the order they were made.
    pub fn final_selection(&mut self) -> Result<Vec<TileInfo>> {
        let (tiling, non_blank) = self.analysis()?;
        Ok(self.selection.merge(&tiling, &non_blank))
    }

    /// `final_selection` re-sorted into page order.
    pub fn final_selection_sorted(&mut self) -> Result<Vec<TileInfo>> {
        Ok(into_page_order(self.final_selection()?))
    }

    pub fn summary(&mut self) -> Result<SelectionSummary> {
        let (tiling, non_blank) = self.analysis()?;
        Ok(self.selection.summary(&tiling, &non_blank))
    }

    /// Snapshot of the current output for reporting or export.
    pub fn plan(&mut self, sorted: bool) -> Result<TilePlan> {
        let (tiling, non_blank) = self.analysis()?;
        let merged = self.selection.merge(&tiling, &non_blank);
        let tiles = if sorted { into_page_order(merged) } else { merged };
        let page = self.page_size();

        Ok(TilePlan {
            paper: self.paper_size.display_name(),
            page_size_in: PhysicalSize {
                width_in: points_to_inches(page.width),
                height_in: points_to_inches(page.height),
            },
            scale: self.scale,
            rotation_degrees: self.rotation.degrees(),
            source_width: self.source.width(),
            source_height: self.source.height(),
            tiling,
            tiles,
            overrides: self.selection.overrides().collect(),
            summary: self.selection.summary(&tiling, &non_blank),
        })
    }

    // -- Internals ------------------------------------------------------------

    /// Pixel size of the region a calibration measurement refers to.
    fn measured_pixels(&self) -> Result<(u32, u32)> {
        let (width, height) = (self.source.width(), self.source.height());
        if is_calibration_image(width, height) {
            let sheet = CalibrationSheet::default();
            return Ok(if width == sheet.width {
                (sheet.rect_width, sheet.rect_height)
            } else {
                (sheet.rect_height, sheet.rect_width)
            });
        }
        let baseline = calculate_single_page_preview(width as i32, height as i32, self.page_size())?;
        Ok((baseline.image_width as u32, baseline.image_height as u32))
    }

    fn cache_key(&self) -> CacheKey {
        let page = self.page_size();
        CacheKey {
            scale_bits: self.scale.to_bits(),
            rotation_epoch: self.rotation_epoch,
            fingerprint: self.source.fingerprint().to_owned(),
            page_width_bits: page.width.to_bits(),
            page_height_bits: page.height.to_bits(),
        }
    }

    fn analysis(&mut self) -> Result<(TilingResult, Vec<TileInfo>)> {
        let key = self.cache_key();
        if let Some(cached) = self.cache.as_ref().filter(|c| c.key == key) {
            return Ok((cached.tiling, cached.non_blank.clone()));
        }

        let tiling = calculate_scaled_tiling(
            self.source.width() as i32,
            self.source.height() as i32,
            self.page_size(),
            self.scale,
        )?;
        let non_blank = self.analyzer.non_blank_tiles(&tiling, Some(&self.source));
        self.analysis_runs += 1;
        debug!(
            tiles_wide = tiling.tiles_wide,
            tiles_high = tiling.tiles_high,
            non_blank = non_blank.len(),
            "Tile analysis refreshed"
        );

        self.cache = Some(CachedAnalysis {
            key,
            tiling,
            non_blank: non_blank.clone(),
        });
        Ok((tiling, non_blank))
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use tilewerk_core::types::Orientation;

    const LETTER: (u32, u32) = (612, 792);

    /// White Letter-sized canvas with dark marks in the top-left and
    /// bottom-right quarters.
    fn two_corner_image() -> SourceImage {
        let (w, h) = LETTER;
        let mut img = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
        for (x0, y0) in [(0, 0), (w / 2, h / 2)] {
            for y in y0..y0 + h / 2 {
                for x in x0..x0 + w / 2 {
                    img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
                }
            }
        }
        SourceImage::from_dynamic(DynamicImage::ImageRgba8(img))
    }

    fn letter_config() -> TilerConfig {
        TilerConfig {
            paper_size: PaperSize::Letter,
            ..TilerConfig::default()
        }
    }

    fn session() -> TilingSession {
        TilingSession::new(two_corner_image(), &letter_config()).unwrap()
    }

    #[test]
    fn scale_two_gives_two_by_two_with_blank_corners() {
        let mut session = session();
        session.set_scale(2.0).unwrap();
        let tiling = session.tiling().unwrap();
        assert_eq!((tiling.tiles_wide, tiling.tiles_high), (2, 2));
        assert_eq!(tiling.orientation, Orientation::Portrait);

        let keys: Vec<_> = session
            .non_blank_tiles()
            .unwrap()
            .iter()
            .map(|t| (t.col, t.row, t.tile_number))
            .collect();
        assert_eq!(keys, vec![(0, 0, 1), (1, 1, 4)]);
    }

    #[test]
    fn analysis_is_memoized_until_inputs_change() {
        let mut session = session();
        session.set_scale(2.0).unwrap();
        session.final_selection().unwrap();
        session.summary().unwrap();
        session.toggle_tile(TileKey::new(0, 0)).unwrap();
        assert_eq!(session.analysis_runs(), 1);

        session.set_scale(2.0).unwrap();
        session.tiling().unwrap();
        assert_eq!(session.analysis_runs(), 1);

        session.set_paper_size(PaperSize::A4);
        session.tiling().unwrap();
        assert_eq!(session.analysis_runs(), 2);
    }

    #[test]
    fn overrides_survive_scale_change_but_not_rotation() {
        let mut session = session();
        session.set_scale(2.0).unwrap();
        session.toggle_tile(TileKey::new(0, 0)).unwrap();
        assert_eq!(session.tile_state(TileKey::new(0, 0)), TileState::Excluded);

        session.set_scale(3.0).unwrap();
        assert_eq!(session.tile_state(TileKey::new(0, 0)), TileState::Excluded);

        session.rotate_clockwise();
        assert!(session.selection().is_empty());
        assert_eq!(session.rotation().degrees(), 90);
        assert_eq!(
            (session.source().width(), session.source().height()),
            (LETTER.1, LETTER.0)
        );
    }

    #[test]
    fn rotation_always_refreshes_analysis() {
        let mut session = session();
        session.tiling().unwrap();
        for _ in 0..4 {
            session.rotate_clockwise();
        }
        // Back to the original pixels, but the epoch moved on.
        session.tiling().unwrap();
        assert_eq!(session.analysis_runs(), 2);
    }

    #[test]
    fn final_selection_appends_forced_inclusions() {
        let mut session = session();
        session.set_scale(2.0).unwrap();
        // Force the blank (1, 0) in, exclude the non-blank (0, 0).
        session.set_tile_state(TileKey::new(1, 0), TileState::Included).unwrap();
        session.toggle_tile(TileKey::new(0, 0)).unwrap();

        let order: Vec<u32> = session
            .final_selection()
            .unwrap()
            .iter()
            .map(|t| t.tile_number)
            .collect();
        assert_eq!(order, vec![4, 2]);
        let sorted: Vec<u32> = session
            .final_selection_sorted()
            .unwrap()
            .iter()
            .map(|t| t.tile_number)
            .collect();
        assert_eq!(sorted, vec![2, 4]);

        let summary = session.summary().unwrap();
        assert_eq!(summary.pages_to_print, 2);
        assert_eq!(summary.manually_excluded, 1);
        assert_eq!(summary.manually_included, 1);
        assert_eq!(summary.paper_saved, 2);
    }

    #[test]
    fn out_of_grid_toggle_is_rejected() {
        let mut session = session();
        let err = session.toggle_tile(TileKey::new(5, 5)).unwrap_err();
        assert!(matches!(err, TilerError::OutOfBoundsTile { .. }));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn invalid_scale_is_rejected_and_previous_kept() {
        let mut session = session();
        session.set_scale(1.5).unwrap();
        assert!(matches!(
            session.set_scale(0.0),
            Err(TilerError::InvalidScale(_))
        ));
        assert!(session.set_scale(f32::NAN).is_err());
        assert_eq!(session.scale(), 1.5);
    }

    #[test]
    fn calibration_replaces_scale() {
        let mut session = session();
        session.set_scale(2.5).unwrap();
        let report = session.apply_calibration(4.2, 3.15).unwrap();
        assert_eq!(session.scale(), report.calibrated_scale);
        assert!(session.scale() < 1.0);
        assert!(session.apply_calibration(0.0, 3.0).is_err());
        assert_eq!(session.scale(), report.calibrated_scale);
    }

    #[test]
    fn calibration_dpi_uses_single_page_print_for_ordinary_images() {
        // Letter image on Letter paper prints at 612 x 792 pt, 8.5 x 11 in.
        let mut session = session();
        let report = session.apply_calibration(8.5, 11.0).unwrap();
        assert!((report.printer_dpi - 72.0).abs() < 1e-3);
    }

    #[test]
    fn plan_serializes_current_state() {
        let mut session = session();
        session.set_scale(2.0).unwrap();
        session.toggle_tile(TileKey::new(1, 1)).unwrap();
        let plan = session.plan(false).unwrap();
        assert_eq!(plan.paper, "Letter (8.5\" × 11\")");
        assert!((plan.page_size_in.width_in - 8.5).abs() < 1e-6);
        assert_eq!(plan.tiles.len(), 1);
        assert_eq!(plan.overrides, vec![(TileKey::new(1, 1), TileOverride::Excluded)]);

        let json = serde_json::to_string(&plan).unwrap();
        let back: TilePlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
