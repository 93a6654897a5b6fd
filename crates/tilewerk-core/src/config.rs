// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Every tunable threshold is passed explicitly rather
// than read from global state.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds for blank-tile detection.
///
/// The defaults are empirical and are kept for behavioural compatibility
/// with existing tile plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Pixels with alpha below this are treated as transparent.
    pub transparent_alpha: u8,
    /// R, G and B all at or above this count as pure white.
    pub pure_white: u8,
    /// R, G and B all at or above this count as near-white.
    pub near_white: u8,
    /// A tile has content when meaningful/sampled exceeds this ratio.
    pub content_ratio: f64,
    /// Native regions narrower or shorter than this are blank.
    pub min_region_px: u32,
    /// Sampling stride is `min(region_w, region_h) / sample_divisor`.
    pub sample_divisor: u32,
    /// Without pixels, edge fragments at or below this share of a full tile
    /// are blank.
    pub min_area_fraction: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            transparent_alpha: 30,
            pure_white: 250,
            near_white: 240,
            content_ratio: 0.03,
            min_region_px: 5,
            sample_divisor: 15,
            min_area_fraction: 0.10,
        }
    }
}

/// Reference rectangle and DPI bounds used during printer calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Width of the printed reference rectangle in inches.
    pub reference_width_in: f32,
    /// Height of the printed reference rectangle in inches.
    pub reference_height_in: f32,
    pub min_dpi: i32,
    pub max_dpi: i32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_width_in: 4.0,
            reference_height_in: 3.0,
            min_dpi: 50,
            max_dpi: 600,
        }
    }
}

/// Top-level settings for a tiling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// Paper the tiles are printed on.
    pub paper_size: crate::PaperSize,
    /// Scale applied when a session starts (1.0 = fits one page).
    pub default_scale: f32,
    pub analyzer: AnalyzerConfig,
    pub calibration: CalibrationConfig,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            default_scale: 1.0,
            analyzer: AnalyzerConfig::default(),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl TilerConfig {
    /// Load settings from a JSON file; absent fields take their defaults.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
