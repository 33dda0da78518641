//! Synthetic NWP host for exercising the extreme-events plugin without a
//! real model: builds a regular global grid, fills wind fields with a smooth
//! flow plus scripted anomalies, and drives the plugin step by step.

use std::sync::LazyLock;
use std::time::Instant;

pub mod cli;
pub mod fields;
pub mod host;
pub mod io;
pub mod svg_export;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
