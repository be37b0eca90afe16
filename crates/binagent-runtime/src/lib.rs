pub mod config_file;
pub mod env;
pub mod runner;
pub mod runtime_resolver;

pub use runner::{build_runtime_paths, RuntimePaths};

/// Test helpers shared with the `binagent` crate through the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub mod testutil {
    use std::sync::{Mutex, MutexGuard};

    static SPAWN_LOCK: Mutex<()> = Mutex::new(());
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes script writes and spawns so no fork inherits a script that
    /// is still open for writing (ETXTBSY).
    pub fn spawn_lock() -> MutexGuard<'static, ()> {
        SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Serializes tests that export or read process variables, and removes
    /// `keys` from the environment before handing out the guard.
    /// Take it before `spawn_lock` when a test needs both.
    pub fn env_lock(keys: &[&str]) -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            std::env::remove_var(key);
        }
        guard
    }

    #[cfg(unix)]
    pub fn write_script(path: &std::path::Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Stand-in for a system `python3`: handles `-m venv` by copying itself into
    /// `<venv>/bin/python`, and logs `-m pip` invocations to `<venv>/pip.log`.
    /// Any other invocation (running an entry point) is logged to
    /// `<venv>/launched.log`.
    #[cfg(unix)]
    pub fn fake_python(path: &std::path::Path, pip_exit: i32) {
        write_script(
            path,
            &format!(
                r#"if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin" && cp "$0" "$3/bin/python" && exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  shift 2
  echo "$*" >> "$(dirname "$0")/../pip.log"
  exit {pip_exit}
fi
echo "$*" >> "$(dirname "$0")/../launched.log"
exit 0"#
            ),
        );
    }
}
