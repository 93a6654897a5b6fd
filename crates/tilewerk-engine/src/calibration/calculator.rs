// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calibration calculator — turns a ruler measurement of the printed
// reference rectangle into a corrective scale factor, and estimates the
// DPI the printer actually used.

use serde::{Deserialize, Serialize};
use tilewerk_core::CalibrationConfig;
use tilewerk_core::error::{Result, TilerError};
use tracing::{info, instrument, warn};

/// Width and height of the calibration sheet image, in pixels.
pub const CALIBRATION_IMAGE_SIZE: (u32, u32) = (3300, 2550);

/// A user's measurement of the printed reference rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMeasurement {
    pub measured_width_in: f32,
    pub measured_height_in: f32,
    /// Known width of the reference rectangle.
    pub ref_width_in: f32,
    /// Known height of the reference rectangle.
    pub ref_height_in: f32,
}

impl CalibrationMeasurement {
    /// Measurement against the standard 4.0 x 3.0 in rectangle.
    pub fn new(measured_width_in: f32, measured_height_in: f32) -> Self {
        Self::with_reference(
            measured_width_in,
            measured_height_in,
            &CalibrationConfig::default(),
        )
    }

    pub fn with_reference(
        measured_width_in: f32,
        measured_height_in: f32,
        config: &CalibrationConfig,
    ) -> Self {
        Self {
            measured_width_in,
            measured_height_in,
            ref_width_in: config.reference_width_in,
            ref_height_in: config.reference_height_in,
        }
    }

    /// Average of the two axis-wise correction ratios.
    ///
    /// Non-uniform (aspect-distorting) printer error is averaged, not
    /// corrected.
    #[instrument(level = "debug", skip(self), fields(w = self.measured_width_in, h = self.measured_height_in))]
    pub fn calibrated_scale(&self) -> Result<f32> {
        self.validate()?;
        let width_scale = self.ref_width_in / self.measured_width_in;
        let height_scale = self.ref_height_in / self.measured_height_in;
        Ok((width_scale + height_scale) / 2.0)
    }

    fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.measured_width_in) && ok(self.measured_height_in) {
            Ok(())
        } else {
            Err(TilerError::InvalidMeasurement {
                width_in: self.measured_width_in,
                height_in: self.measured_height_in,
            })
        }
    }
}

/// Corrective scale for a measurement of the standard 4.0 x 3.0 in rectangle.
pub fn calibrated_scale(measured_w_in: f32, measured_h_in: f32) -> Result<f32> {
    CalibrationMeasurement::new(measured_w_in, measured_h_in).calibrated_scale()
}

/// Printer DPI implied by `image_w_px` printing `measured_w_in` wide, clamped
/// to 50..=600.
pub fn estimate_dpi(image_w_px: u32, measured_w_in: f32) -> i32 {
    estimate_dpi_within(image_w_px, measured_w_in, &CalibrationConfig::default())
}

/// `estimate_dpi` with configurable clamp bounds.
pub fn estimate_dpi_within(image_w_px: u32, measured_w_in: f32, config: &CalibrationConfig) -> i32 {
    // Float-to-int casts saturate, so zero or NaN measurements land on a bound.
    let raw = (image_w_px as f32 / measured_w_in).round() as i32;
    let clamped = raw.max(config.min_dpi).min(config.max_dpi);
    if clamped != raw {
        warn!(raw, clamped, "Estimated DPI out of range, clamped");
    }
    clamped
}

/// Average DPI over both axes for an image of `px_w` x `px_h` that printed
/// as `measured_w_in` x `measured_h_in`.
pub fn actual_dpi(measured_w_in: f32, measured_h_in: f32, px_w: u32, px_h: u32) -> Result<f32> {
    CalibrationMeasurement::new(measured_w_in, measured_h_in).validate()?;
    let width_dpi = px_w as f32 / measured_w_in;
    let height_dpi = px_h as f32 / measured_h_in;
    Ok((width_dpi + height_dpi) / 2.0)
}

/// Whether an image has the calibration sheet's dimensions, in either
/// orientation.
pub fn is_calibration_image(width: u32, height: u32) -> bool {
    let (w, h) = CALIBRATION_IMAGE_SIZE;
    (width, height) == (w, h) || (width, height) == (h, w)
}

/// How far a calibrated scale strays from 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationQuality {
    /// Within 0.5%.
    Excellent,
    /// Within 1%.
    Good,
    /// Within 2%.
    Acceptable,
    /// Within 5%; worth re-measuring.
    Warning,
    /// Beyond 5%; measurement or printer settings are likely wrong.
    Poor,
}

impl CalibrationQuality {
    pub fn from_scale(scale: f32) -> Self {
        let percent_error = (scale - 1.0).abs() * 100.0;
        if percent_error <= 0.5 {
            Self::Excellent
        } else if percent_error <= 1.0 {
            Self::Good
        } else if percent_error <= 2.0 {
            Self::Acceptable
        } else if percent_error <= 5.0 {
            Self::Warning
        } else {
            Self::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT (±0.5% or better)",
            Self::Good => "GOOD (±1% tolerance)",
            Self::Acceptable => "ACCEPTABLE (±2% tolerance)",
            Self::Warning => "WARNING (±5% error - check measurements)",
            Self::Poor => "POOR (>5% error - please re-measure or check printer settings)",
        }
    }
}

/// Everything learned from one calibration session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub measurement: CalibrationMeasurement,
    pub calibrated_scale: f32,
    /// Average DPI the printer used for the reference print.
    pub printer_dpi: f32,
    pub quality: CalibrationQuality,
}

impl CalibrationReport {
    /// Evaluate `measurement` of a reference print that was
    /// `printed_px.0` x `printed_px.1` pixels at scale 1.0.
    #[instrument(skip_all, fields(printed_w = printed_px.0, printed_h = printed_px.1))]
    pub fn new(measurement: CalibrationMeasurement, printed_px: (u32, u32)) -> Result<Self> {
        let calibrated_scale = measurement.calibrated_scale()?;
        let printer_dpi = actual_dpi(
            measurement.measured_width_in,
            measurement.measured_height_in,
            printed_px.0,
            printed_px.1,
        )?;
        let quality = CalibrationQuality::from_scale(calibrated_scale);

        if matches!(quality, CalibrationQuality::Warning | CalibrationQuality::Poor) {
            warn!(calibrated_scale, ?quality, "Calibration deviates noticeably from 1.0");
        } else {
            info!(calibrated_scale, printer_dpi, ?quality, "Calibration complete");
        }

        Ok(Self {
            measurement,
            calibrated_scale,
            printer_dpi,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_measurement_gives_unit_scale() {
        assert_eq!(calibrated_scale(4.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn long_width_gives_scale_just_under_one() {
        let scale = calibrated_scale(4.04, 3.0).unwrap();
        assert!((scale - 0.995).abs() < 0.001, "got {scale}");
    }

    #[test]
    fn uniform_shrink_is_fully_corrected() {
        let scale = calibrated_scale(3.8, 2.85).unwrap();
        assert!((scale - 4.0 / 3.8).abs() < 1e-5);
    }

    #[test]
    fn non_positive_measurement_is_rejected() {
        assert!(matches!(
            calibrated_scale(0.0, 3.0),
            Err(TilerError::InvalidMeasurement { .. })
        ));
        assert!(calibrated_scale(4.0, -1.0).is_err());
        assert!(calibrated_scale(f32::NAN, 3.0).is_err());
    }

    #[test]
    fn custom_reference_rectangle() {
        let config = CalibrationConfig {
            reference_width_in: 8.0,
            reference_height_in: 6.0,
            ..Default::default()
        };
        let m = CalibrationMeasurement::with_reference(8.0, 6.0, &config);
        assert_eq!(m.calibrated_scale().unwrap(), 1.0);
    }

    #[test]
    fn dpi_estimate_rounds_and_clamps() {
        assert_eq!(estimate_dpi(3300, 11.0), 300);
        assert_eq!(estimate_dpi(1, 1000.0), 50);
        assert_eq!(estimate_dpi(100_000, 1.0), 600);
        assert_eq!(estimate_dpi(3300, 0.0), 600);
        assert_eq!(estimate_dpi(601, 4.0), 150);
    }

    #[test]
    fn actual_dpi_averages_axes() {
        let dpi = actual_dpi(4.0, 3.0, 600, 450).unwrap();
        assert!((dpi - 150.0).abs() < 1e-4);
        assert!(actual_dpi(0.0, 3.0, 600, 450).is_err());
    }

    #[test]
    fn quality_bands() {
        assert_eq!(CalibrationQuality::from_scale(1.004), CalibrationQuality::Excellent);
        assert_eq!(CalibrationQuality::from_scale(0.992), CalibrationQuality::Good);
        assert_eq!(CalibrationQuality::from_scale(1.015), CalibrationQuality::Acceptable);
        assert_eq!(CalibrationQuality::from_scale(0.96), CalibrationQuality::Warning);
        assert_eq!(CalibrationQuality::from_scale(1.2), CalibrationQuality::Poor);
    }

    #[test]
    fn calibration_image_detected_in_both_orientations() {
        assert!(is_calibration_image(3300, 2550));
        assert!(is_calibration_image(2550, 3300));
        assert!(!is_calibration_image(3300, 3300));
    }

    #[test]
    fn report_bundles_scale_dpi_and_quality() {
        let report = CalibrationReport::new(CalibrationMeasurement::new(4.04, 3.0), (770, 595)).unwrap();
        assert!((report.calibrated_scale - 0.995).abs() < 0.001);
        assert_eq!(report.quality, CalibrationQuality::Excellent);
        let expected_dpi = (770.0 / 4.04 + 595.0 / 3.0) / 2.0;
        assert!((report.printer_dpi - expected_dpi).abs() < 1e-3);
    }
}
