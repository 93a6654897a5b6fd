// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing in the engine is transient, so severity only separates problems
// the user can fix by changing input from files we cannot use at all.

use crate::error::TilerError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must change an input (scale, measurement, tile choice).
    ActionRequired,
    /// Cannot be fixed by changing a value: unreadable file or bad config.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.message, self.suggestion)
    }
}

/// Convert a `TilerError` into a `HumanError`.
pub fn humanize_error(err: &TilerError) -> HumanError {
    match err {
        TilerError::InvalidDimensions {
            image_width,
            image_height,
            page_width,
            page_height,
        } => {
            let page_ok = page_width.is_finite()
                && page_height.is_finite()
                && *page_width > 0.0
                && *page_height > 0.0;
            if *image_width <= 0 || *image_height <= 0 {
                HumanError {
                    message: "The image is too small to tile.".into(),
                    suggestion: format!(
                        "Try a larger scale or a different picture. (Size: {image_width} × {image_height})"
                    ),
                    severity: Severity::ActionRequired,
                }
            } else if page_ok {
                // Valid sizes that still need more pages than can be counted.
                HumanError {
                    message: "That would need far too many pages.".into(),
                    suggestion: "Use a smaller scale or a bigger paper size.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The paper size doesn't make sense.".into(),
                    suggestion: "Pick one of the standard paper sizes and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            }
        }

        TilerError::InvalidScale(scale) => HumanError {
            message: "That scale can't be used.".into(),
            suggestion: format!("Enter a number bigger than zero, like 1.0 or 2.5. (You entered {scale})"),
            severity: Severity::ActionRequired,
        },

        TilerError::InvalidMeasurement {
            width_in,
            height_in,
        } => HumanError {
            message: "Those measurements don't look right.".into(),
            suggestion: format!(
                "Measure the printed rectangle again with a ruler. Both sides must be more than zero. ({width_in} × {height_in} in)"
            ),
            severity: Severity::ActionRequired,
        },

        TilerError::OutOfBoundsTile { col, row, .. } => HumanError {
            message: "That spot isn't on the page grid.".into(),
            suggestion: format!("Click inside one of the tiles. (Column {col}, row {row})"),
            severity: Severity::ActionRequired,
        },

        TilerError::InvalidTileKey(raw) => HumanError {
            message: "We couldn't understand that tile.".into(),
            suggestion: format!("Write tiles as column,row, for example 2,0. (You wrote {raw:?})"),
            severity: Severity::ActionRequired,
        },

        TilerError::ImageError(detail) => HumanError {
            message: "We couldn't open this picture.".into(),
            suggestion: format!("Try saving it as a PNG or JPEG first. ({detail})"),
            severity: Severity::Permanent,
        },

        TilerError::Io(io_err) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: format!("Check the file exists and you're allowed to open it. ({io_err})"),
            severity: Severity::Permanent,
        },

        TilerError::Serialization(detail) => HumanError {
            message: "The settings file is damaged.".into(),
            suggestion: format!("Delete it to go back to the defaults. ({detail})"),
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_image_is_action_required() {
        let err = TilerError::invalid_dimensions(0, 100, 595.44, 841.68);
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("too small"));
    }

    #[test]
    fn bad_page_mentions_paper() {
        let err = TilerError::invalid_dimensions(100, 100, 0.0, 841.68);
        assert!(humanize_error(&err).message.contains("paper"));
    }

    #[test]
    fn oversized_grid_suggests_smaller_scale() {
        let err = TilerError::invalid_dimensions(i32::MAX, i32::MAX, 36.0, 36.0);
        let human = humanize_error(&err);
        assert!(human.message.contains("too many pages"));
        assert!(human.suggestion.contains("smaller scale"));
    }

    #[test]
    fn out_of_bounds_names_the_cell() {
        let err = TilerError::OutOfBoundsTile {
            col: 4,
            row: 1,
            tiles_wide: 2,
            tiles_high: 2,
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("Column 4, row 1"));
    }

    #[test]
    fn unreadable_image_is_permanent() {
        let human = humanize_error(&TilerError::ImageError("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}
