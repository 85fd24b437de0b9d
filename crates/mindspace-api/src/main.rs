//! MindSpace terminal client entry point.
//!
//! Binary name: `mindspace`
//!
//! Parses CLI arguments, restores the persisted session, then dispatches to
//! the view or command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use mindspace_core::route::Route;

use cli::login::Entry;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,mindspace_core=debug,mindspace_infra=debug,mindspace_api=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mindspace", &mut std::io::stdout());
        return Ok(());
    }

    let mut state = AppState::init(cli.data_dir.clone()).await?;

    match cli.command {
        Commands::Open { path } => {
            cli::open::open(&mut state, &path, cli.json).await?;
        }

        Commands::Login { no_dashboard } => {
            let next = cli::login::login_view(&mut state, Entry::Direct, cli.json).await?;
            if let Some(route) = next.filter(|_| !no_dashboard && !cli.json) {
                cli::open::run_from(&mut state, route, Entry::Direct, cli.json).await?;
            }
        }

        Commands::Logout { force } => {
            cli::session::logout(&mut state, force, cli.json)?;
        }

        Commands::Whoami => {
            cli::session::whoami(&mut state, cli.json).await?;
        }

        Commands::Chat => {
            cli::open::open(&mut state, Route::Dashboard.path(), cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
