// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tilewerk.

use thiserror::Error;

/// Top-level error type for all Tilewerk operations.
///
/// Every variant is a deterministic validation failure: none of them are
/// transient, so there is no retry classification.
#[derive(Debug, Error)]
pub enum TilerError {
    // -- Geometry --
    #[error(
        "invalid dimensions: image {image_width}x{image_height} px, page {page_width}x{page_height} pt"
    )]
    InvalidDimensions {
        image_width: i64,
        image_height: i64,
        page_width: f64,
        page_height: f64,
    },

    #[error("invalid scale factor: {0}")]
    InvalidScale(f32),

    // -- Calibration --
    #[error("invalid measurement: {width_in} x {height_in} in")]
    InvalidMeasurement { width_in: f32, height_in: f32 },

    // -- Selection --
    #[error("tile ({col},{row}) is outside the {tiles_wide}x{tiles_high} grid")]
    OutOfBoundsTile {
        col: u32,
        row: u32,
        tiles_wide: u32,
        tiles_high: u32,
    },

    #[error("invalid tile key {0:?}, expected \"col,row\"")]
    InvalidTileKey(String),

    // -- Images --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TilerError {
    /// Shorthand for a geometry precondition failure.
    pub fn invalid_dimensions(
        image_width: impl Into<i64>,
        image_height: impl Into<i64>,
        page_width: f64,
        page_height: f64,
    ) -> Self {
        Self::InvalidDimensions {
            image_width: image_width.into(),
            image_height: image_height.into(),
            page_width,
            page_height,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TilerError>;
