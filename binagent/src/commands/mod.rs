//! `binagent` subcommands.
//!
//! Each command takes the resolved `LauncherConfig` plus its own flags and a
//! `Prompt` when it may ask the user something. Errors are `anyhow` wrapping
//! `LaunchError` where an exit code matters; `main` downcasts to pick it.

pub mod check;
pub mod clean;
pub mod setup;
pub mod start;
