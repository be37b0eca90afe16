use binagent::cli::{Cli, Commands};
use binagent::commands::{check, clean, setup, start};
use binagent::observability;
use binagent::prompt::Console;
use binagent_core::config::LauncherConfig;
use binagent_core::LaunchError;
use clap::Parser;

fn main() {
    observability::init_tracing();
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            err.downcast_ref::<LaunchError>()
                .map(LaunchError::exit_code)
                .unwrap_or(1)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = LauncherConfig::resolve(&cli.global.into());
    tracing::debug!(?config, "resolved configuration");
    let mut prompt = Console::stdio();

    match cli.command {
        Commands::Setup {
            force_recreate,
            keep_existing,
        } => {
            let policy = if force_recreate {
                setup::RecreatePolicy::Force
            } else if keep_existing {
                setup::RecreatePolicy::Keep
            } else {
                setup::RecreatePolicy::Ask
            };
            setup::cmd_setup(&config, policy, &mut prompt)?;
            Ok(0)
        }
        Commands::Start { no_pause } => {
            let opts = start::StartOptions {
                pause_after_create: !no_pause,
            };
            start::cmd_start(&config, opts, &mut prompt, &mut std::io::stdout())
        }
        Commands::Check { json } => check::cmd_check(&config, json, &mut std::io::stdout()),
        Commands::Clean { dry_run, force } => {
            clean::cmd_clean(&config, dry_run, force, &mut prompt)?;
            Ok(0)
        }
    }
}
