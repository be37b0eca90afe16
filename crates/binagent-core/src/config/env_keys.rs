//! 环境变量 key 常量与别名定义
//!
//! Primary keys use the `BINAGENT_*` prefix. None of these are read from the
//! application's `.env`; they configure the launcher itself.

/// Project layout
pub mod paths {
    pub const BINAGENT_PROJECT_DIR: &str = "BINAGENT_PROJECT_DIR";
    pub const BINAGENT_VENV_DIR: &str = "BINAGENT_VENV_DIR";
    pub const BINAGENT_ENTRY: &str = "BINAGENT_ENTRY";
    pub const BINAGENT_MANIFEST: &str = "BINAGENT_MANIFEST";
    pub const BINAGENT_ENV_FILE: &str = "BINAGENT_ENV_FILE";
    pub const BINAGENT_ENV_TEMPLATE: &str = "BINAGENT_ENV_TEMPLATE";
}

/// System interpreter used to create the virtual environment
pub mod python {
    pub const BINAGENT_PYTHON: &str = "BINAGENT_PYTHON";
    pub const PYTHON_ALIASES: &[&str] = &["PYTHON"];
}

/// 可观测性与日志
pub mod observability {
    pub const BINAGENT_QUIET: &str = "BINAGENT_QUIET";
    pub const BINAGENT_LOG_LEVEL: &str = "BINAGENT_LOG_LEVEL";
    pub const BINAGENT_LOG_JSON: &str = "BINAGENT_LOG_JSON";
}
