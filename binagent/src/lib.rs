pub mod cli;
pub mod commands;
pub mod observability;
pub mod prompt;

