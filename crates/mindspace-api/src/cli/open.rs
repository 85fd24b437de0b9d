//! View navigation: resolve a path through the session guard and run the
//! view it lands on, following any redirect the view hands back.

use console::style;

use mindspace_core::route::{Route, navigate};

use crate::state::AppState;

use super::chat::loop_runner::run_chat_loop;
use super::login::{Entry, login_view};

/// Open the view at `path`.
pub async fn open(state: &mut AppState, path: &str, json: bool) -> anyhow::Result<()> {
    let navigation = navigate(path, &state.session)?;
    let entry = match navigation.redirected_from {
        Some(from) => {
            if !json {
                println!(
                    "\n  {} Sign in to open {}",
                    style("!").yellow().bold(),
                    style(from).cyan()
                );
            }
            Entry::Redirected
        }
        None => Entry::Direct,
    };
    run_from(state, navigation.route, entry, json).await
}

/// Run `route`, then whatever view it redirects to, until one settles.
pub async fn run_from(
    state: &mut AppState,
    route: Route,
    entry: Entry,
    json: bool,
) -> anyhow::Result<()> {
    let mut next = Some((route, entry));
    while let Some((route, entry)) = next.take() {
        tracing::debug!(%route, ?entry, "Entering view");
        next = match route {
            Route::Landing => {
                print_landing(json);
                None
            }
            Route::Login => login_view(state, entry, json)
                .await?
                .map(|r| (r, Entry::Direct)),
            Route::Dashboard => run_chat_loop(state)
                .await?
                .map(|r| (r, Entry::Redirected)),
        };
    }
    Ok(())
}

fn print_landing(json: bool) {
    if json {
        println!("{}", serde_json::json!({ "view": Route::Landing.path() }));
        return;
    }
    println!();
    println!("  {}", style("MindSpace").magenta().bold());
    println!("  {}", style("A calm place to talk things through.").dim());
    println!();
    println!(
        "  {} {}",
        style("Get started:").bold(),
        style("mindspace login").cyan()
    );
    println!();
}
