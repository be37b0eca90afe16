//! Runtime paths for a virtual environment and blocking process execution.
//!
//! "Activating" a venv is expressed as data: the interpreter path plus the
//! `VIRTUAL_ENV` / `PATH` entries handed to each spawned `Command`. The
//! launcher's own environment is left untouched.

use binagent_core::LaunchError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Interpreter and directories of a resolved virtual environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub python: PathBuf,
    /// `bin` (Unix) or `Scripts` (Windows) directory of the venv.
    pub bin_dir: PathBuf,
    pub env_dir: PathBuf,
}

/// Resolve interpreter paths inside `env_dir`.
///
/// Fails with `EnvironmentMissing` when the directory is absent and with
/// `InterpreterMissing` when it exists but holds no interpreter.
pub fn build_runtime_paths(env_dir: &Path) -> Result<RuntimePaths, LaunchError> {
    if !env_dir.is_dir() {
        return Err(LaunchError::EnvironmentMissing {
            path: env_dir.to_path_buf(),
        });
    }

    let candidates = [
        (env_dir.join("bin"), "python"),
        (env_dir.join("Scripts"), "python.exe"),
    ];
    for (bin_dir, exe) in candidates {
        let python = bin_dir.join(exe);
        if python.exists() {
            return Ok(RuntimePaths {
                python,
                bin_dir,
                env_dir: env_dir.to_path_buf(),
            });
        }
    }

    Err(LaunchError::InterpreterMissing {
        venv: env_dir.to_path_buf(),
    })
}

impl RuntimePaths {
    /// Build a command running the venv interpreter with the venv environment applied.
    pub fn python_command(&self) -> Command {
        let mut cmd = Command::new(&self.python);
        self.apply_env(&mut cmd);
        cmd
    }

    /// Apply `VIRTUAL_ENV`, a `PATH` led by the venv bin dir, and drop `PYTHONHOME`.
    pub fn apply_env(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.env_dir);
        cmd.env("PATH", self.search_path());
        cmd.env_remove("PYTHONHOME");
    }

    fn search_path(&self) -> OsString {
        let mut dirs = vec![self.bin_dir.clone()];
        if let Some(path) = std::env::var_os("PATH") {
            dirs.extend(std::env::split_paths(&path));
        }
        // join_paths only fails on a separator inside an entry; keep the inherited value then.
        std::env::join_paths(dirs)
            .unwrap_or_else(|_| std::env::var_os("PATH").unwrap_or_default())
    }
}

/// Exit code to report for a finished child: its own code, or `128 + signal`
/// when it was killed by a signal (SIGINT → 130).
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

/// Run one setup step with inherited stdio; a non-zero exit becomes `StepFailed`.
pub fn run_step(cmd: &mut Command, step: &'static str) -> Result<(), LaunchError> {
    tracing::debug!(step, command = ?cmd, "running step");
    let status = cmd.status().map_err(|source| LaunchError::Spawn {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })?;
    if !status.success() {
        return Err(LaunchError::StepFailed {
            step,
            code: exit_code_of(status),
        });
    }
    Ok(())
}

/// Spawn `<venv python> <entry>` in `cwd`, wait for it, and return its exit code.
///
/// No signal handler is installed: Ctrl+C reaches the whole foreground group.
pub fn launch(runtime: &RuntimePaths, entry: &Path, cwd: &Path) -> Result<i32, LaunchError> {
    let mut cmd = runtime.python_command();
    cmd.arg(entry).current_dir(cwd);
    tracing::info!(python = %runtime.python.display(), entry = %entry.display(), "launching application");
    let status = cmd.status().map_err(|source| LaunchError::Spawn {
        program: runtime.python.to_string_lossy().into_owned(),
        source,
    })?;
    let code = exit_code_of(status);
    tracing::info!(code, "application exited");
    Ok(code)
}
