//! Build the project's Python venv and install its manifest with pip.

use binagent_core::LaunchError;
use std::path::Path;
use std::process::Command;

use crate::runner::{build_runtime_paths, run_step, RuntimePaths};

/// The environment exists iff its directory exists.
pub fn venv_exists(env_dir: &Path) -> bool {
    env_dir.is_dir()
}

/// `python -m venv <env_dir>` using the system interpreter.
pub fn create_venv(python: &Path, env_dir: &Path) -> Result<RuntimePaths, LaunchError> {
    tracing::info!(python = %python.display(), venv = %env_dir.display(), "creating virtual environment");
    let mut cmd = Command::new(python);
    cmd.arg("-m").arg("venv").arg(env_dir);
    run_step(&mut cmd, "create virtual environment")?;
    build_runtime_paths(env_dir)
}

/// `<venv python> -m pip install --upgrade pip`
pub fn upgrade_pip(runtime: &RuntimePaths) -> Result<(), LaunchError> {
    tracing::info!("upgrading pip");
    let mut cmd = runtime.python_command();
    cmd.args(["-m", "pip", "install", "--upgrade", "pip"]);
    run_step(&mut cmd, "pip upgrade")
}

/// `<venv python> -m pip install -r <manifest>`
pub fn install_manifest(runtime: &RuntimePaths, manifest: &Path) -> Result<(), LaunchError> {
    if !manifest.is_file() {
        return Err(LaunchError::ManifestMissing {
            path: manifest.to_path_buf(),
        });
    }
    tracing::info!(manifest = %manifest.display(), "installing dependencies");
    let mut cmd = runtime.python_command();
    cmd.args(["-m", "pip", "install", "-r"]).arg(manifest);
    run_step(&mut cmd, "dependency install")
}

pub fn remove_venv(env_dir: &Path) -> Result<(), LaunchError> {
    tracing::info!(venv = %env_dir.display(), "removing virtual environment");
    std::fs::remove_dir_all(env_dir)?;
    Ok(())
}

/// Create the venv, upgrade pip, then install `manifest`. `env_dir` must not exist.
pub fn build_environment(
    python: &Path,
    env_dir: &Path,
    manifest: &Path,
) -> Result<RuntimePaths, LaunchError> {
    let runtime = create_venv(python, env_dir)?;
    upgrade_pip(&runtime)?;
    install_manifest(&runtime, manifest)?;
    Ok(runtime)
}
