// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command line to the tilewerk backend crates.
//
// Each service wraps one backend concern in a shape the CLI can call
// directly: configuration lookup, and rendering a plan for the terminal.

pub mod config_dir;
pub mod report;
