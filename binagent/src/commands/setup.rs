//! `binagent setup`: create (or recreate) the venv and install the manifest.

use anyhow::Result;
use binagent_core::{config::LauncherConfig, LaunchError};
use binagent_runtime::env::{builder, marker};
use binagent_runtime::runtime_resolver::find_system_python;

use crate::prompt::Prompt;

/// What to do when the environment directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecreatePolicy {
    #[default]
    Ask,
    Force,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Created,
    Recreated,
    KeptExisting,
}

pub fn cmd_setup(
    config: &LauncherConfig,
    policy: RecreatePolicy,
    prompt: &mut dyn Prompt,
) -> Result<SetupOutcome> {
    let venv = &config.venv_dir;
    let exists = builder::venv_exists(venv);

    if exists {
        let recreate = match policy {
            RecreatePolicy::Force => true,
            RecreatePolicy::Keep => false,
            RecreatePolicy::Ask => prompt.confirm(&format!(
                "Virtual environment already exists at {}. Recreate it? (y/n)",
                venv.display()
            ))?,
        };
        if !recreate {
            eprintln!("✓ Using existing virtual environment at {}", venv.display());
            return Ok(SetupOutcome::KeptExisting);
        }
    }

    // Preconditions are checked before anything on disk changes.
    if !config.manifest.is_file() {
        return Err(LaunchError::ManifestMissing {
            path: config.manifest.clone(),
        }
        .into());
    }
    let python = find_system_python(config.python.as_deref())?;

    if exists {
        eprintln!("🗑  Removing {}", venv.display());
        builder::remove_venv(venv)?;
    }

    eprintln!("📦 Creating virtual environment at {}", venv.display());
    let runtime = builder::build_environment(&python, venv, &config.manifest)?;
    marker::write_marker(venv, &python, &config.manifest)?;

    eprintln!();
    eprintln!("✓ Setup complete ({})", runtime.python.display());
    eprintln!("  Next: binagent start");

    Ok(if exists {
        SetupOutcome::Recreated
    } else {
        SetupOutcome::Created
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Console;
    use std::io::Cursor;
    use std::path::Path;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
        let mut out = Vec::new();
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            for entry in std::fs::read_dir(&d).unwrap().flatten() {
                let p = entry.path();
                if p.is_dir() {
                    stack.push(p);
                } else {
                    out.push((p.display().to_string(), std::fs::read(&p).unwrap()));
                }
            }
        }
        out.sort();
        out
    }

    fn existing_venv(root: &Path) -> LauncherConfig {
        let cfg = LauncherConfig::with_defaults(root);
        std::fs::create_dir_all(cfg.venv_dir.join("lib")).unwrap();
        std::fs::write(cfg.venv_dir.join("lib/site.py"), "# installed").unwrap();
        std::fs::write(cfg.venv_dir.join("pyvenv.cfg"), "home = /usr/bin").unwrap();
        cfg
    }

    #[test]
    fn test_answer_no_leaves_env_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = existing_venv(tmp.path());
        let before = snapshot(&cfg.venv_dir);

        let mut c = console("n\n");
        let outcome = cmd_setup(&cfg, RecreatePolicy::Ask, &mut c).unwrap();

        assert_eq!(outcome, SetupOutcome::KeptExisting);
        assert_eq!(snapshot(&cfg.venv_dir), before);
        let asked = String::from_utf8(c.into_output()).unwrap();
        assert!(asked.contains("Recreate it? (y/n)"));
    }

    #[test]
    fn test_keep_policy_never_prompts() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = existing_venv(tmp.path());
        let before = snapshot(&cfg.venv_dir);

        let mut c = console("y\n");
        let outcome = cmd_setup(&cfg, RecreatePolicy::Keep, &mut c).unwrap();

        assert_eq!(outcome, SetupOutcome::KeptExisting);
        assert_eq!(snapshot(&cfg.venv_dir), before);
        assert!(c.into_output().is_empty());
    }

    #[test]
    fn test_recreate_without_manifest_keeps_env() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = existing_venv(tmp.path());

        let err = cmd_setup(&cfg, RecreatePolicy::Force, &mut console("")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LaunchError>(),
            Some(LaunchError::ManifestMissing { .. })
        ));
        assert!(cfg.venv_dir.join("pyvenv.cfg").exists());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use binagent_runtime::testutil::{fake_python, spawn_lock, write_script};

        fn project(root: &Path) -> LauncherConfig {
            let mut cfg = LauncherConfig::with_defaults(root);
            let python = root.join("sys/python3");
            fake_python(&python, 0);
            cfg.python = Some(python);
            std::fs::write(&cfg.manifest, "fastapi\nuvicorn\n").unwrap();
            cfg
        }

        #[test]
        fn test_fresh_setup_installs_manifest_without_prompt() {
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path());

            let mut c = console("");
            let outcome = cmd_setup(&cfg, RecreatePolicy::Ask, &mut c).unwrap();

            assert_eq!(outcome, SetupOutcome::Created);
            assert!(c.into_output().is_empty());
            assert!(cfg.venv_dir.join("bin/python").exists());
            let log = std::fs::read_to_string(cfg.venv_dir.join("pip.log")).unwrap();
            assert!(log.contains("install --upgrade pip"));
            assert!(log.contains(&format!("install -r {}", cfg.manifest.display())));
            let m = marker::read_marker(&cfg.venv_dir).unwrap();
            assert_eq!(m.manifest_sha256, marker::manifest_digest(&cfg.manifest).unwrap());
        }

        #[test]
        fn test_answer_yes_recreates() {
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path());
            std::fs::create_dir_all(&cfg.venv_dir).unwrap();
            std::fs::write(cfg.venv_dir.join("stale.txt"), "old").unwrap();

            let outcome = cmd_setup(&cfg, RecreatePolicy::Ask, &mut console("y\n")).unwrap();

            assert_eq!(outcome, SetupOutcome::Recreated);
            assert!(!cfg.venv_dir.join("stale.txt").exists());
            assert!(cfg.venv_dir.join(marker::MARKER_FILE).exists());
        }

        #[test]
        fn test_creation_failure_propagates_exit_code() {
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let mut cfg = project(tmp.path());
            let broken = tmp.path().join("sys/broken-python");
            write_script(&broken, "exit 5");
            cfg.python = Some(broken);

            let err = cmd_setup(&cfg, RecreatePolicy::Ask, &mut console("")).unwrap_err();
            let launch = err.downcast_ref::<LaunchError>().unwrap();
            assert_eq!(launch.exit_code(), 5);
        }
    }
}
