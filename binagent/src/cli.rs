use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use binagent_core::config::CliOverrides;

/// binagent - set up the agent's Python environment and launch its API server
#[derive(Parser, Debug)]
#[command(name = "binagent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Project directory holding main.py, requirements.txt and .env (default: current directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub project_dir: Option<PathBuf>,

    /// Virtual environment directory, relative to the project (default: venv)
    #[arg(long, value_name = "DIR", global = true)]
    pub venv: Option<PathBuf>,

    /// System Python used to create the environment (default: python3, then python)
    #[arg(long, value_name = "PATH", global = true)]
    pub python: Option<PathBuf>,

    /// Application entry point, relative to the project (default: main.py)
    #[arg(long, value_name = "FILE", global = true)]
    pub entry: Option<PathBuf>,
}

impl From<GlobalArgs> for CliOverrides {
    fn from(g: GlobalArgs) -> Self {
        CliOverrides {
            project_dir: g.project_dir,
            venv: g.venv,
            python: g.python,
            entry: g.entry,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the virtual environment and install requirements.txt
    ///
    /// When the environment already exists you are asked whether to recreate
    /// it; answering no keeps it untouched.
    Setup {
        /// Recreate an existing environment without asking
        #[arg(long, conflicts_with = "keep_existing")]
        force_recreate: bool,

        /// Keep an existing environment without asking
        #[arg(long)]
        keep_existing: bool,
    },

    /// Ensure .env exists, then run the application inside the environment
    Start {
        /// Do not wait for Enter after creating .env from .env.example
        #[arg(long)]
        no_pause: bool,
    },

    /// Check environment, manifest and .env settings without starting anything
    Check {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the virtual environment
    Clean {
        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
}
