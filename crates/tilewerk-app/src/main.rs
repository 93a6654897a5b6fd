// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tilewerk — print large images across multiple pages, skipping the blank ones
//
// Entry point. Initialises logging, parses the command line, runs one tiling
// session and prints the resulting plan.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tilewerk_core::error::Result;
use tilewerk_core::human_errors::humanize_error;
use tilewerk_core::types::{PaperSize, TileKey};
use tilewerk_engine::calibration::is_calibration_image;
use tilewerk_engine::{CalibrationSheet, TileState, TilingSession};

use services::config_dir::{resolve_config, save_config};
use services::report::RunReport;

/// Split an image into printable page tiles and skip the blank ones.
#[derive(Parser, Debug)]
#[command(name = "tilewerk", version)]
#[command(about = "Print large images across multiple pages, skipping blank ones")]
struct Args {
    /// Image to tile
    #[arg(required_unless_present = "calibration_sheet")]
    image: Option<PathBuf>,

    /// Paper size: a4, a3, letter, legal or tabloid
    #[arg(short, long)]
    paper: Option<PaperSize>,

    /// Enlargement over the single-page fit (1.0 = one page)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Rotate the image clockwise this many quarter turns
    #[arg(short, long, default_value_t = 0)]
    rotate: u32,

    /// Never print this tile, given as col,row (repeatable)
    #[arg(long, value_name = "COL,ROW")]
    exclude: Vec<TileKey>,

    /// Always print this tile, given as col,row (repeatable)
    #[arg(long, value_name = "COL,ROW")]
    include: Vec<TileKey>,

    /// Measured size in inches of the printed calibration rectangle
    #[arg(long, num_args = 2, value_names = ["WIDTH_IN", "HEIGHT_IN"])]
    calibrate: Option<Vec<f32>>,

    /// Settings file (JSON); defaults to the per-user config if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,

    /// Emit the plan as JSON
    #[arg(long)]
    json: bool,

    /// List tiles in strict page order
    #[arg(long)]
    sorted: bool,

    /// Write the printable calibration sheet as PNG and exit
    #[arg(long, value_name = "OUT.png", conflicts_with = "image")]
    calibration_sheet: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "tilewerk failed");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(out) = &args.calibration_sheet {
        std::fs::write(out, CalibrationSheet::default().to_png_bytes()?)?;
        tracing::info!(path = %out.display(), "Calibration sheet written");
        println!(
            "Calibration sheet written to {}. Print it at 100% and measure the rectangle.",
            out.display()
        );
        return Ok(());
    }

    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(paper) = args.paper {
        config.paper_size = paper;
    }
    if let Some(scale) = args.scale {
        config.default_scale = scale;
    }
    if let Some(path) = &args.save_config {
        save_config(&config, path)?;
    }

    // clap guarantees an image unless --calibration-sheet was given.
    let Some(image) = &args.image else {
        return Ok(());
    };
    let mut session = TilingSession::open(image, &config)?;
    tracing::info!("Session started");

    for _ in 0..args.rotate % 4 {
        session.rotate_clockwise();
    }

    let calibration = match args.calibrate.as_deref() {
        Some(&[width_in, height_in]) => {
            let source = session.source();
            if !is_calibration_image(source.width(), source.height()) {
                tracing::warn!(
                    width = source.width(),
                    height = source.height(),
                    "Image does not look like the calibration sheet"
                );
            }
            Some(session.apply_calibration(width_in, height_in)?)
        }
        _ => None,
    };

    for key in &args.exclude {
        reach_state(&mut session, *key, TileState::Excluded)?;
    }
    for key in &args.include {
        reach_state(&mut session, *key, TileState::Included)?;
    }

    let report = RunReport {
        plan: session.plan(args.sorted)?,
        calibration,
    };
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

/// Toggle `key` until it sits in `target`; at most two steps round the cycle.
fn reach_state(session: &mut TilingSession, key: TileKey, target: TileState) -> Result<()> {
    while session.tile_state(key) != target {
        session.toggle_tile(key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_full_invocation() {
        let args = Args::try_parse_from([
            "tilewerk",
            "poster.png",
            "--paper",
            "letter",
            "--scale",
            "2.5",
            "--exclude",
            "0,1",
            "--exclude",
            "2, 3",
            "--include",
            "1,0",
            "--calibrate",
            "4.1",
            "3.0",
            "--sorted",
        ])
        .unwrap();
        assert_eq!(args.paper, Some(PaperSize::Letter));
        assert_eq!(args.scale, Some(2.5));
        assert_eq!(args.exclude, vec![TileKey::new(0, 1), TileKey::new(2, 3)]);
        assert_eq!(args.include, vec![TileKey::new(1, 0)]);
        assert_eq!(args.calibrate, Some(vec![4.1, 3.0]));
        assert!(args.sorted);
        assert!(!args.json);
    }

    #[test]
    fn image_required_without_calibration_sheet() {
        assert!(Args::try_parse_from(["tilewerk"]).is_err());
        let args = Args::try_parse_from(["tilewerk", "--calibration-sheet", "sheet.png"]).unwrap();
        assert!(args.image.is_none());
    }

    #[test]
    fn bad_tile_key_and_paper_are_rejected() {
        assert!(Args::try_parse_from(["tilewerk", "a.png", "--exclude", "x,1"]).is_err());
        assert!(Args::try_parse_from(["tilewerk", "a.png", "--paper", "b5"]).is_err());
    }

    #[test]
    fn run_writes_calibration_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sheet.png");
        let args =
            Args::try_parse_from(["tilewerk", "--calibration-sheet", out.to_str().unwrap()])
                .unwrap();
        run(args).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn run_over_sheet_with_overrides_and_calibration() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("sheet.png");
        let saved = dir.path().join("saved.json");
        std::fs::write(&sheet, CalibrationSheet::default().to_png_bytes().unwrap()).unwrap();

        let args = Args::try_parse_from([
            "tilewerk",
            sheet.to_str().unwrap(),
            "--include",
            "0,0",
            "--calibrate",
            "4.0",
            "3.0",
            "--save-config",
            saved.to_str().unwrap(),
            "--json",
        ])
        .unwrap();
        run(args).unwrap();
        assert!(saved.is_file());
    }
}
