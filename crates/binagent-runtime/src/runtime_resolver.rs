//! Locate the system interpreter used to create the virtual environment.

use binagent_core::LaunchError;
use std::path::{Path, PathBuf};

const SEARCH_ORDER: &[&str] = &["python3", "python"];

/// An explicit interpreter (name or path) wins; otherwise search `PATH` for
/// `python3`, then `python`.
pub fn find_system_python(explicit: Option<&Path>) -> Result<PathBuf, LaunchError> {
    if let Some(p) = explicit {
        return which::which(p).map_err(|e| {
            tracing::debug!(python = %p.display(), error = %e, "configured interpreter not usable");
            LaunchError::PythonNotFound
        });
    }
    SEARCH_ORDER
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or(LaunchError::PythonNotFound)
}
