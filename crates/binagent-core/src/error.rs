//! Launcher error taxonomy and its exit code mapping.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used for every missing-precondition failure.
pub const EXIT_PRECONDITION: i32 = 1;
/// Conventional shell code for "command not found".
pub const EXIT_NOT_FOUND: i32 = 127;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Virtual environment not found at {}. Run `binagent setup` first.", .path.display())]
    EnvironmentMissing { path: PathBuf },

    #[error(
        "No Python interpreter inside {}. Run `binagent setup --force-recreate`.",
        .venv.display()
    )]
    InterpreterMissing { venv: PathBuf },

    #[error(
        "{} not found and no template at {} to create it from",
        .config.display(),
        .template.display()
    )]
    TemplateMissing { config: PathBuf, template: PathBuf },

    #[error("Dependency manifest not found at {}", .path.display())]
    ManifestMissing { path: PathBuf },

    #[error("python3 or python not found in PATH (set BINAGENT_PYTHON or pass --python)")]
    PythonNotFound,

    #[error("{step} failed with exit code {code}")]
    StepFailed { step: &'static str, code: i32 },

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl LaunchError {
    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EnvironmentMissing { .. }
            | Self::InterpreterMissing { .. }
            | Self::TemplateMissing { .. }
            | Self::ManifestMissing { .. }
            | Self::Io(_) => EXIT_PRECONDITION,
            Self::PythonNotFound => EXIT_NOT_FOUND,
            Self::StepFailed { code, .. } => *code,
            Self::Spawn { source, .. } => {
                if source.kind() == io::ErrorKind::NotFound {
                    EXIT_NOT_FOUND
                } else {
                    EXIT_PRECONDITION
                }
            }
        }
    }
}
