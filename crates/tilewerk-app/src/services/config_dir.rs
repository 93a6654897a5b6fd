// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration lookup.

use std::path::{Path, PathBuf};

use tilewerk_core::TilerConfig;
use tilewerk_core::error::Result;
use tracing::{debug, info};

/// File name of the per-user settings file.
pub const CONFIG_FILE: &str = "config.json";

/// Return the per-user configuration directory (not created).
pub fn config_dir() -> PathBuf {
    config_base().join("tilewerk")
}

/// Settings for this run.
///
/// An explicit path must exist and parse. Without one, the per-user file is
/// used when present, and the built-in defaults otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> Result<TilerConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading configuration");
        return TilerConfig::load(path);
    }

    let user_file = config_dir().join(CONFIG_FILE);
    if user_file.is_file() {
        info!(path = %user_file.display(), "Loading user configuration");
        TilerConfig::load(&user_file)
    } else {
        debug!("No configuration file, using defaults");
        Ok(TilerConfig::default())
    }
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_config(config: &TilerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    info!(path = %path.display(), "Configuration saved");
    Ok(())
}

fn config_base() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
