// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tilewerk-engine — Tiling engine for printing large images across pages.
//
// Provides page-grid geometry (orientation choice, scaling), blank-tile
// detection on real pixels, tri-state manual selection, printer calibration,
// and an interactive session that ties them together with memoized analysis.

pub mod calibration;
pub mod content;
pub mod geometry;
pub mod image;
pub mod scale;
pub mod selection;
pub mod session;

// Re-export the primary items so callers can use `tilewerk_engine::TilingSession` etc.
pub use calibration::{CalibrationMeasurement, CalibrationReport, CalibrationSheet};
pub use content::{ContentAnalyzer, PixelSource};
pub use geometry::{calculate_optimal_tiling, calculate_scaled_tiling, calculate_single_page_preview};
pub use self::image::SourceImage;
pub use selection::{SelectionModel, SelectionSummary, TileOverride, TileState};
pub use session::{TilePlan, TilingSession};
