//! `binagent clean`: remove the project's virtual environment.

use anyhow::Result;
use binagent_core::config::LauncherConfig;
use binagent_runtime::env::builder;
use std::fs;
use std::path::Path;

use crate::prompt::Prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    NothingToDo,
    DryRun,
    Cancelled,
    Removed,
}

pub fn cmd_clean(
    config: &LauncherConfig,
    dry_run: bool,
    force: bool,
    prompt: &mut dyn Prompt,
) -> Result<CleanOutcome> {
    let venv = &config.venv_dir;
    if !builder::venv_exists(venv) {
        eprintln!("No virtual environment found at {}", venv.display());
        return Ok(CleanOutcome::NothingToDo);
    }

    let size = dir_size(venv);
    eprintln!("🗂  Virtual environment: {} ({})", venv.display(), format_size(size));

    if dry_run {
        eprintln!("(Dry run: nothing removed. Drop --dry-run to delete.)");
        return Ok(CleanOutcome::DryRun);
    }

    if !force && !prompt.confirm("Remove it? [y/N]")? {
        eprintln!("Cancelled.");
        return Ok(CleanOutcome::Cancelled);
    }

    builder::remove_venv(venv)?;
    eprintln!("✓ Removed {}, freed {}", venv.display(), format_size(size));
    Ok(CleanOutcome::Removed)
}

/// Compute total size of a directory recursively.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_dir() {
                total += dir_size(&p);
            } else if let Ok(meta) = p.metadata() {
                total += meta.len();
            }
        }
    }
    total
}

/// Format byte size to human-readable string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
