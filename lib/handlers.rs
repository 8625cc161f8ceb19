//! Command handlers.

mod config;
mod setup;
mod statusline;

use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::document::ConfigDocument;
use crate::error::{PlatformError, PlatformResult};

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use config::*;
pub use setup::*;
pub use statusline::*;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolve `--dir`, defaulting to the current directory.
fn resolve_dir(dir: Option<PathBuf>) -> PlatformResult<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_document(path: &Path) -> PlatformResult<ConfigDocument> {
    let document = ConfigDocument::read(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(document)
}

fn print_json<T: Serialize>(value: &T) -> PlatformResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mark(ok: bool) -> ColoredString {
    if ok {
        "✓".bright_green()
    } else {
        "✗".bright_red()
    }
}

/// Turn per-item failures into the error that sets the exit code.
fn fail_if_any(failed: &[String]) -> PlatformResult<()> {
    if failed.is_empty() {
        Ok(())
    } else {
        Err(PlatformError::ApplyFailed(failed.join(", ")))
    }
}
