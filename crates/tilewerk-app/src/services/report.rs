// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering of a tile plan (and optional calibration result) for the
// terminal, as aligned plain text or pretty JSON.

use std::fmt::Write as _;

use serde::Serialize;
use tilewerk_core::error::Result;
use tilewerk_core::types::Orientation;
use tilewerk_engine::{CalibrationReport, TilePlan};

/// Everything one run reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: TilePlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationReport>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let plan = &self.plan;
        let tiling = &plan.tiling;
        let summary = &plan.summary;
        let orientation = match tiling.orientation {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        };

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "Image:      {} × {} px (rotated {}°)",
            plan.source_width, plan.source_height, plan.rotation_degrees
        );
        let _ = writeln!(out, "Paper:      {}, {}", plan.paper, plan.page_size_in);
        let _ = writeln!(out, "Scale:      {:.3}", plan.scale);
        let _ = writeln!(
            out,
            "Grid:       {} × {} {} pages ({} tiles)",
            tiling.tiles_wide, tiling.tiles_high, orientation, summary.grid_tiles
        );
        let _ = writeln!(
            out,
            "Pages:      {} to print, {} blank or skipped",
            summary.pages_to_print, summary.paper_saved
        );
        if summary.manually_excluded > 0 || summary.manually_included > 0 {
            let _ = writeln!(
                out,
                "Overrides:  {} excluded, {} forced in",
                summary.manually_excluded, summary.manually_included
            );
        }

        if let Some(report) = &self.calibration {
            let _ = writeln!(
                out,
                "Calibrated: scale {:.4} at ~{:.0} DPI, {}",
                report.calibrated_scale,
                report.printer_dpi,
                report.quality.description()
            );
        }

        if plan.tiles.is_empty() {
            let _ = writeln!(out, "Tiles:      none");
        } else {
            let _ = writeln!(out, "Tiles:");
            for tile in &plan.tiles {
                let _ = writeln!(
                    out,
                    "  page {:>3}  column {}, row {}",
                    tile.tile_number, tile.col, tile.row
                );
            }
        }
        out
    }
}
