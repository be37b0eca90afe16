//! 按领域分组的配置结构体
//!
//! 解析顺序：CLI 参数 → 环境变量 → 默认值。

use super::env_keys::{observability as obv_keys, paths, python};
use super::loader::{env_bool, env_optional, env_or};
use std::path::{Path, PathBuf};

pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_ENTRY: &str = "main.py";
pub const DEFAULT_MANIFEST: &str = "requirements.txt";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_ENV_TEMPLATE: &str = ".env.example";

/// Values given on the command line. `None` falls through to env / defaults.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub project_dir: Option<PathBuf>,
    pub venv: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub entry: Option<PathBuf>,
}

/// Resolved project layout. `project_dir` is absolute, and every other path
/// is joined onto it unless it was given as an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub project_dir: PathBuf,
    pub venv_dir: PathBuf,
    pub manifest: PathBuf,
    pub env_file: PathBuf,
    pub env_template: PathBuf,
    pub entry_point: PathBuf,
    /// System interpreter used to create the venv. `None` means search `PATH`.
    pub python: Option<PathBuf>,
}

impl LauncherConfig {
    pub fn resolve(cli: &CliOverrides) -> Self {
        let project_dir = cli
            .project_dir
            .clone()
            .or_else(|| env_optional(paths::BINAGENT_PROJECT_DIR, &[]).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        // The application is spawned inside project_dir, so nothing below may
        // stay relative to the launcher's working directory.
        let project_dir = absolute(project_dir);

        let venv = cli.venv.clone().unwrap_or_else(|| {
            PathBuf::from(env_or(paths::BINAGENT_VENV_DIR, &[], || {
                DEFAULT_VENV_DIR.to_string()
            }))
        });
        let entry = cli.entry.clone().unwrap_or_else(|| {
            PathBuf::from(env_or(paths::BINAGENT_ENTRY, &[], || DEFAULT_ENTRY.to_string()))
        });
        let manifest = env_or(paths::BINAGENT_MANIFEST, &[], || {
            DEFAULT_MANIFEST.to_string()
        });
        let env_file = env_or(paths::BINAGENT_ENV_FILE, &[], || {
            DEFAULT_ENV_FILE.to_string()
        });
        let env_template = env_or(paths::BINAGENT_ENV_TEMPLATE, &[], || {
            DEFAULT_ENV_TEMPLATE.to_string()
        });
        let python = cli.python.clone().or_else(|| {
            env_optional(python::BINAGENT_PYTHON, python::PYTHON_ALIASES).map(PathBuf::from)
        });

        Self {
            venv_dir: anchor(&project_dir, venv),
            manifest: anchor(&project_dir, manifest.into()),
            env_file: anchor(&project_dir, env_file.into()),
            env_template: anchor(&project_dir, env_template.into()),
            entry_point: anchor(&project_dir, entry),
            python,
            project_dir,
        }
    }

    /// Default layout under `project_dir`, ignoring the process environment.
    pub fn with_defaults(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            venv_dir: project_dir.join(DEFAULT_VENV_DIR),
            manifest: project_dir.join(DEFAULT_MANIFEST),
            env_file: project_dir.join(DEFAULT_ENV_FILE),
            env_template: project_dir.join(DEFAULT_ENV_TEMPLATE),
            entry_point: project_dir.join(DEFAULT_ENTRY),
            python: None,
            project_dir,
        }
    }
}

fn absolute(p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        return p;
    }
    match std::env::current_dir() {
        Ok(cwd) if p == Path::new(".") => cwd,
        Ok(cwd) => cwd.join(p),
        Err(_) => p,
    }
}

fn anchor(base: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(obv_keys::BINAGENT_QUIET, &[], false),
            log_level: env_or(obv_keys::BINAGENT_LOG_LEVEL, &[], || {
                "binagent=info".to_string()
            }),
            log_json: env_bool(obv_keys::BINAGENT_LOG_JSON, &[], false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_layout() {
        let cfg = LauncherConfig::with_defaults("/srv/agent");
        assert_eq!(cfg.venv_dir, PathBuf::from("/srv/agent/venv"));
        assert_eq!(cfg.manifest, PathBuf::from("/srv/agent/requirements.txt"));
        assert_eq!(cfg.env_file, PathBuf::from("/srv/agent/.env"));
        assert_eq!(cfg.env_template, PathBuf::from("/srv/agent/.env.example"));
        assert_eq!(cfg.entry_point, PathBuf::from("/srv/agent/main.py"));
        assert!(cfg.python.is_none());
    }

    #[test]
    fn test_cli_overrides_anchor_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let abs_venv = tmp.path().join("elsewhere");
        let cfg = LauncherConfig::resolve(&CliOverrides {
            project_dir: Some(tmp.path().to_path_buf()),
            venv: Some(abs_venv.clone()),
            python: Some(PathBuf::from("/usr/bin/python3.12")),
            entry: Some(PathBuf::from("server/app.py")),
        });
        assert_eq!(cfg.project_dir, tmp.path());
        assert_eq!(cfg.venv_dir, abs_venv);
        assert_eq!(cfg.entry_point, tmp.path().join("server/app.py"));
        assert_eq!(cfg.python.as_deref(), Some(Path::new("/usr/bin/python3.12")));
    }

    #[test]
    fn test_relative_project_dir_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let cfg = LauncherConfig::resolve(&CliOverrides {
            project_dir: Some(PathBuf::from("proj")),
            ..Default::default()
        });
        assert_eq!(cfg.project_dir, cwd.join("proj"));
        assert!(cfg.venv_dir.is_absolute());
        assert_eq!(cfg.entry_point, cwd.join("proj").join(DEFAULT_ENTRY));

        let cfg = LauncherConfig::resolve(&CliOverrides {
            project_dir: Some(PathBuf::from(".")),
            ..Default::default()
        });
        assert_eq!(cfg.project_dir, cwd);
    }
}
