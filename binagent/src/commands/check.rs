//! `binagent check`: report whether the project is ready to start.
//!
//! Covers the venv, the manifest, the configuration file and the settings the
//! application reads from it. A setting exported in the launcher's environment
//! wins over the file, as it does for the application. Secret values are never
//! printed. `start` does not run these checks; it only needs the files to exist.

use anyhow::Result;
use binagent_core::config::LauncherConfig;
use binagent_core::dotenv::EnvFile;
use binagent_runtime::build_runtime_paths;
use binagent_runtime::env::marker::{manifest_state, ManifestState};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: Status,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub items: Vec<CheckItem>,
}

impl CheckReport {
    fn push(&mut self, name: impl Into<String>, status: Status, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name: name.into(),
            status,
            detail: detail.into(),
        });
    }

    pub fn passed(&self) -> bool {
        self.items.iter().all(|i| i.status != Status::Fail)
    }

    pub fn item(&self, name: &str) -> Option<&CheckItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// A setting the application reads from its configuration file.
struct Setting {
    key: &'static str,
    default: Option<&'static str>,
    secret: bool,
}

const SETTINGS: &[Setting] = &[
    Setting { key: "GEMINI_API_KEY", default: None, secret: true },
    Setting { key: "GEMINI_MODEL", default: Some("gemini-2.0-flash"), secret: false },
    Setting { key: "BINANCE_API_URL", default: Some("https://api.binance.com"), secret: false },
    Setting { key: "API_HOST", default: Some("0.0.0.0"), secret: false },
    Setting { key: "API_PORT", default: Some("8000"), secret: false },
    Setting { key: "DEFAULT_SYMBOL", default: Some("BTCUSDT"), secret: false },
];

pub fn run_checks(config: &LauncherConfig) -> CheckReport {
    let mut report = CheckReport::default();

    match build_runtime_paths(&config.venv_dir) {
        Ok(rt) => report.push("virtual environment", Status::Pass, rt.python.display().to_string()),
        Err(e) => report.push("virtual environment", Status::Fail, e.to_string()),
    }

    if !config.manifest.is_file() {
        report.push(
            "manifest",
            Status::Fail,
            format!("{} not found", config.manifest.display()),
        );
    } else {
        match manifest_state(&config.venv_dir, &config.manifest) {
            ManifestState::Drifted => report.push(
                "manifest",
                Status::Warn,
                "changed since setup; run `binagent setup --force-recreate`",
            ),
            ManifestState::Current => report.push("manifest", Status::Pass, "installed"),
            ManifestState::Unknown => report.push(
                "manifest",
                Status::Pass,
                config.manifest.display().to_string(),
            ),
        }
    }

    let env = match EnvFile::read(&config.env_file) {
        Ok(f) => {
            report.push(
                "configuration file",
                Status::Pass,
                config.env_file.display().to_string(),
            );
            f
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let hint = if config.env_template.is_file() {
                "run `binagent start` to create it from the template"
            } else {
                "and no template to create it from"
            };
            report.push(
                "configuration file",
                Status::Fail,
                format!("{} missing; {}", config.env_file.display(), hint),
            );
            return report;
        }
        Err(e) => {
            report.push(
                "configuration file",
                Status::Fail,
                format!("{} unreadable: {}", config.env_file.display(), e),
            );
            return report;
        }
    };
    let template = EnvFile::read(&config.env_template).unwrap_or_default();

    for s in SETTINGS {
        check_setting(&mut report, s, &env, &template);
    }
    for (line, raw) in &env.malformed {
        report.push(
            format!("line {}", line),
            Status::Warn,
            format!("not a KEY=value assignment: {}", raw.trim()),
        );
    }

    report
}

fn check_setting(report: &mut CheckReport, s: &Setting, env: &EnvFile, template: &EnvFile) {
    let value = env.effective(s.key).filter(|v| !v.trim().is_empty());
    let Some(value) = value else {
        match s.default {
            Some(d) => report.push(s.key, Status::Pass, format!("default ({})", d)),
            None => report.push(s.key, Status::Fail, "required but missing or empty"),
        }
        return;
    };

    if s.key == "API_PORT" && value.parse::<u16>().is_err() {
        report.push(s.key, Status::Fail, format!("'{}' is not a port number", value));
        return;
    }
    if s.secret && template.get(s.key) == Some(value.as_str()) {
        report.push(s.key, Status::Warn, "still the template placeholder");
        return;
    }

    let shown = if s.secret { "set".to_string() } else { value };
    report.push(s.key, Status::Pass, shown);
}

/// Exit code 0 when nothing failed, 1 otherwise.
pub fn cmd_check(config: &LauncherConfig, json: bool, out: &mut dyn Write) -> Result<i32> {
    let report = run_checks(config);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        for item in &report.items {
            let mark = match item.status {
                Status::Pass => "✓",
                Status::Warn => "⚠",
                Status::Fail => "✗",
            };
            writeln!(out, "{} {}: {}", mark, item.name, item.detail)?;
        }
        writeln!(out)?;
        if report.passed() {
            writeln!(out, "Ready: run `binagent start`")?;
        } else {
            writeln!(out, "Not ready: fix the items marked ✗")?;
        }
    }

    Ok(if report.passed() { 0 } else { 1 })
}
