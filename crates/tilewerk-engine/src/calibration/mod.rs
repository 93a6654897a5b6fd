// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calibration module — printer scale correction from a measured reference
// rectangle, DPI estimation, and the printable reference sheet.

pub mod calculator;
pub mod sheet;

pub use calculator::{
    CalibrationMeasurement, CalibrationQuality, CalibrationReport, actual_dpi, calibrated_scale,
    estimate_dpi, estimate_dpi_within, is_calibration_image,
};
pub use sheet::CalibrationSheet;
