//! CLI command definitions for the `mindspace` binary.
//!
//! Each view of the client maps onto a command: `open` resolves a path the
//! way the router would, `login` and `chat` enter the login and dashboard
//! views directly.

pub mod chat;
pub mod login;
pub mod open;
pub mod session;

use std::path::PathBuf;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Sign in and chat with the MindSpace assistant.
#[derive(Parser)]
#[command(name = "mindspace", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding config.toml and the persisted session.
    #[arg(long, global = true, env = "MINDSPACE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a view by path (`/`, `/login`, `/dashboard`).
    Open {
        /// Path to open.
        #[arg(default_value = "/")]
        path: String,
    },

    /// Sign in with Google.
    Login {
        /// Stay on the login view instead of continuing to the dashboard.
        #[arg(long)]
        no_dashboard: bool,
    },

    /// Sign out and forget the persisted session.
    Logout {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show the signed-in user.
    Whoami,

    /// Open the dashboard and start chatting.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Start a steady-ticking spinner on stderr.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
