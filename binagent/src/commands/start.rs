//! `binagent start`: check preconditions, then run the application in the venv.

use anyhow::Result;
use binagent_core::config::LauncherConfig;
use binagent_core::dotenv::EnvFile;
use binagent_runtime::config_file::{ensure_config_file, ConfigFileState};
use binagent_runtime::env::marker::{manifest_state, ManifestState};
use binagent_runtime::{build_runtime_paths, runner};
use std::io::Write;
use std::path::Path;

use crate::prompt::Prompt;

pub const DEFAULT_PORT: u16 = 8000;
const PORT_KEY: &str = "API_PORT";

#[derive(Debug, Clone, Copy)]
pub struct StartOptions {
    /// Block for Enter after creating the configuration file from its template.
    pub pause_after_create: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            pause_after_create: true,
        }
    }
}

/// Service and documentation URLs shown before launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub service: String,
    pub docs: String,
}

impl Endpoints {
    pub fn for_port(port: u16) -> Self {
        let service = format!("http://localhost:{}", port);
        Self {
            docs: format!("{}/docs", service),
            service,
        }
    }
}

/// `API_PORT` as the application will see it (exported, then the
/// configuration file), or 8000. Display only.
pub fn display_port(env_file: &Path) -> u16 {
    let file = EnvFile::read(env_file).unwrap_or_default();
    match file.effective(PORT_KEY).as_deref() {
        None | Some("") => DEFAULT_PORT,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = raw, "{} is not a port number, showing {}", PORT_KEY, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}

/// Returns the application's exit code.
pub fn cmd_start(
    config: &LauncherConfig,
    opts: StartOptions,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<i32> {
    let runtime = build_runtime_paths(&config.venv_dir)?;

    if ensure_config_file(&config.env_file, &config.env_template)?
        == ConfigFileState::CreatedFromTemplate
    {
        eprintln!(
            "📝 Created {} from {}",
            config.env_file.display(),
            config.env_template.display()
        );
        eprintln!("   Fill in your API keys (e.g. GEMINI_API_KEY) before continuing.");
        if opts.pause_after_create {
            prompt.acknowledge("Press Enter once the file is ready...")?;
        }
    }

    if manifest_state(&config.venv_dir, &config.manifest) == ManifestState::Drifted {
        tracing::warn!(
            manifest = %config.manifest.display(),
            "manifest changed since setup; run `binagent setup --force-recreate` to reinstall"
        );
    }

    let endpoints = Endpoints::for_port(display_port(&config.env_file));
    writeln!(out, "🚀 Starting application...")?;
    writeln!(out, "   Server:   {}", endpoints.service)?;
    writeln!(out, "   API docs: {}", endpoints.docs)?;
    out.flush()?;

    Ok(runner::launch(
        &runtime,
        &config.entry_point,
        &config.project_dir,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Console;
    use binagent_core::LaunchError;
    use binagent_runtime::testutil::env_lock;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_endpoints() {
        let e = Endpoints::for_port(8000);
        assert_eq!(e.service, "http://localhost:8000");
        assert_eq!(e.docs, "http://localhost:8000/docs");
    }

    #[test]
    fn test_display_port() {
        let _env = env_lock(&[PORT_KEY]);
        let tmp = tempfile::tempdir().unwrap();
        let env = tmp.path().join(".env");
        assert_eq!(display_port(&env), 8000);
        std::fs::write(&env, "API_PORT=9001\n").unwrap();
        assert_eq!(display_port(&env), 9001);
        std::fs::write(&env, "API_PORT=eighty\n").unwrap();
        assert_eq!(display_port(&env), 8000);
    }

    #[test]
    fn test_display_port_prefers_exported_value() {
        let _env = env_lock(&[PORT_KEY]);
        let tmp = tempfile::tempdir().unwrap();
        let env = tmp.path().join(".env");
        std::fs::write(&env, "API_PORT=9001\n").unwrap();

        std::env::set_var(PORT_KEY, "9300");
        let with_file = display_port(&env);
        let without_file = display_port(&tmp.path().join("absent.env"));
        std::env::remove_var(PORT_KEY);

        assert_eq!(with_file, 9300);
        assert_eq!(without_file, 9300);
    }

    #[test]
    fn test_missing_env_does_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = LauncherConfig::with_defaults(tmp.path());
        std::fs::write(&cfg.env_template, "GEMINI_API_KEY=\n").unwrap();
        let mut out: Vec<u8> = Vec::new();

        let err = cmd_start(&cfg, StartOptions::default(), &mut console("\n"), &mut out)
            .unwrap_err();

        let launch = err.downcast_ref::<LaunchError>().unwrap();
        assert!(matches!(launch, LaunchError::EnvironmentMissing { .. }));
        assert_eq!(launch.exit_code(), 1);
        assert!(!cfg.env_file.exists());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_config_and_template() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = LauncherConfig::with_defaults(tmp.path());
        std::fs::create_dir_all(cfg.venv_dir.join("bin")).unwrap();
        std::fs::write(cfg.venv_dir.join("bin/python"), "").unwrap();
        let mut out: Vec<u8> = Vec::new();

        let err = cmd_start(&cfg, StartOptions::default(), &mut console(""), &mut out)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LaunchError>(),
            Some(LaunchError::TemplateMissing { .. })
        ));
        assert!(!cfg.env_file.exists());
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use binagent_core::config::CliOverrides;
        use binagent_runtime::testutil::{spawn_lock, write_script};
        use std::path::PathBuf;

        const TEMPLATE: &str = "GEMINI_API_KEY=your_gemini_api_key_here\nAPI_HOST=0.0.0.0\n";

        fn project(root: &Path, app: &str) -> LauncherConfig {
            let cfg = LauncherConfig::with_defaults(root);
            write_script(&cfg.venv_dir.join("bin/python"), app);
            std::fs::write(&cfg.env_template, TEMPLATE).unwrap();
            cfg
        }

        #[test]
        fn test_creates_config_pauses_and_launches() {
            let _env = env_lock(&[PORT_KEY]);
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path(), r#"echo "$1" > launched.txt; exit 0"#);
            let mut c = console("\n");
            let mut out: Vec<u8> = Vec::new();

            let code = cmd_start(&cfg, StartOptions::default(), &mut c, &mut out).unwrap();

            assert_eq!(code, 0);
            assert_eq!(std::fs::read(&cfg.env_file).unwrap(), TEMPLATE.as_bytes());
            assert!(String::from_utf8(c.into_output()).unwrap().contains("Press Enter"));
            let printed = String::from_utf8(out).unwrap();
            assert!(printed.contains("http://localhost:8000\n"));
            assert!(printed.contains("http://localhost:8000/docs"));
            let launched = std::fs::read_to_string(tmp.path().join("launched.txt")).unwrap();
            assert_eq!(launched.trim(), cfg.entry_point.display().to_string());
        }

        #[test]
        fn test_existing_config_skips_pause() {
            let _env = env_lock(&[PORT_KEY]);
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path(), "exit 0");
            std::fs::write(&cfg.env_file, "GEMINI_API_KEY=real\nAPI_PORT=9100\n").unwrap();
            let mut c = console("");
            let mut out: Vec<u8> = Vec::new();

            cmd_start(&cfg, StartOptions::default(), &mut c, &mut out).unwrap();

            assert!(c.into_output().is_empty());
            assert!(String::from_utf8(out).unwrap().contains("http://localhost:9100/docs"));
            assert_eq!(
                std::fs::read_to_string(&cfg.env_file).unwrap(),
                "GEMINI_API_KEY=real\nAPI_PORT=9100\n"
            );
        }

        #[test]
        fn test_no_pause_option() {
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path(), "exit 0");
            let mut c = console("");
            let opts = StartOptions {
                pause_after_create: false,
            };

            cmd_start(&cfg, opts, &mut c, &mut Vec::<u8>::new()).unwrap();

            assert!(cfg.env_file.exists());
            assert!(c.into_output().is_empty());
        }

        #[test]
        fn test_application_exit_code_is_returned() {
            let _guard = spawn_lock();
            let tmp = tempfile::tempdir().unwrap();
            let cfg = project(tmp.path(), "exit 42");
            std::fs::write(&cfg.env_file, "").unwrap();

            let code = cmd_start(&cfg, StartOptions::default(), &mut console(""), &mut Vec::<u8>::new())
                .unwrap();
            assert_eq!(code, 42);
        }

        #[test]
        fn test_relative_project_dir_launches() {
            let _guard = spawn_lock();
            // A project directory named relative to the working directory.
            let tmp = tempfile::Builder::new()
                .prefix("binagent-rel-")
                .tempdir_in(std::env::current_dir().unwrap())
                .unwrap();
            let relative = PathBuf::from(tmp.path().file_name().unwrap());
            let cfg = LauncherConfig::resolve(&CliOverrides {
                project_dir: Some(relative),
                ..Default::default()
            });
            assert!(cfg.project_dir.is_absolute());
            write_script(&cfg.venv_dir.join("bin/python"), r#"echo "$1" > launched.txt"#);
            std::fs::write(&cfg.entry_point, "print('hi')\n").unwrap();
            std::fs::write(&cfg.env_file, "GEMINI_API_KEY=k\n").unwrap();

            let code = cmd_start(&cfg, StartOptions::default(), &mut console(""), &mut Vec::<u8>::new())
                .unwrap();

            assert_eq!(code, 0);
            let launched = std::fs::read_to_string(tmp.path().join("launched.txt")).unwrap();
            assert_eq!(launched.trim(), cfg.entry_point.display().to_string());
        }
    }
}
