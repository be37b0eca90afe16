//! binagent 统一配置层
//!
//! All launcher settings are read here; command code receives a resolved
//! [`LauncherConfig`] instead of calling `std::env::var` itself.
//!
//! - `loader`: env_or, env_optional, env_bool
//! - `schema`: LauncherConfig, ObservabilityConfig
//! - `env_keys`: key constants and aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or};
pub use schema::{CliOverrides, LauncherConfig, ObservabilityConfig};
