//! Virtual environment lifecycle: create, install, remove, and the setup marker.
//!
//! Callers (commands) decide *whether* to recreate; this module only performs
//! the filesystem and subprocess work and reports failures as `LaunchError`.

pub mod builder;
pub mod marker;
