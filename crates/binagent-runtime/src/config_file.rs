//! Guarantee the application's configuration file exists before launch.
//!
//! Only presence is checked here; the file's contents belong to the
//! application.

use binagent_core::LaunchError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileState {
    Present,
    /// Copied byte-for-byte from the template; the user still has to fill it in.
    CreatedFromTemplate,
}

pub fn ensure_config_file(config: &Path, template: &Path) -> Result<ConfigFileState, LaunchError> {
    if config.exists() {
        return Ok(ConfigFileState::Present);
    }
    if !template.is_file() {
        return Err(LaunchError::TemplateMissing {
            config: config.to_path_buf(),
            template: template.to_path_buf(),
        });
    }
    std::fs::copy(template, config)?;
    tracing::info!(
        config = %config.display(),
        template = %template.display(),
        "created configuration file from template"
    );
    Ok(ConfigFileState::CreatedFromTemplate)
}
