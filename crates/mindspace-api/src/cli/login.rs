//! Login view: Google sign-in and the signed-in result card.

use console::style;
use dialoguer::Confirm;

use mindspace_core::route::Route;
use mindspace_infra::google::ConsentHandler;

use crate::state::AppState;

use super::session::{hydrate_profile, identity_json, print_identity};
use super::spinner;

/// How the login view was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// `mindspace login`: start sign-in right away.
    Direct,
    /// Redirected by the session guard or a logout: ask first.
    Redirected,
}

/// Render the login view. Returns the next view to enter, if any.
pub async fn login_view(
    state: &mut AppState,
    entry: Entry,
    json: bool,
) -> anyhow::Result<Option<Route>> {
    if state.session.current().is_some() {
        hydrate_profile(state).await;
        show_signed_in(state, json)?;
        return Ok(None);
    }

    if entry == Entry::Redirected && !json {
        println!();
        println!("  {}", style("Login to MindSpace").magenta().bold());
        let proceed = Confirm::new()
            .with_prompt("Sign in with Google?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if !proceed {
            return Ok(None);
        }
    }

    let progress = spinner("Waiting for Google sign-in...");
    let printer = progress.clone();
    let on_consent_url: ConsentHandler = Box::new(move |url| {
        printer.println(format!(
            "\n  Open this URL in your browser to sign in:\n\n  {}\n",
            style(url).cyan().underlined()
        ));
    });

    let service = match state.login_service(on_consent_url) {
        Ok(service) => service,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e.into());
        }
    };
    let result = service.login(&mut state.session).await;
    progress.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(error = %e, "Login aborted");
            if json {
                let value = serde_json::json!({ "signed_in": false, "error": e.user_message() });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                eprintln!("\n  {} {}\n", style("✗").red().bold(), e.user_message());
            }
            return Ok(None);
        }
    };

    if json {
        let value = serde_json::json!({
            "signed_in": true,
            "id": outcome.identity.id.as_str(),
            "name": outcome.identity.name,
            "email": outcome.identity.email,
            "profile_saved": outcome.profile_sync_error.is_none(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(None);
    }

    print_identity(&outcome.identity);
    if let Some(e) = &outcome.profile_sync_error {
        println!("  {} {}", style("!").yellow().bold(), e.user_message());
        println!();
    }
    Ok(Some(outcome.redirect))
}

fn show_signed_in(state: &AppState, json: bool) -> anyhow::Result<()> {
    let Some(session) = state.session.current() else {
        return Ok(());
    };

    if json {
        let value = identity_json(session.identity(), session.user_id().as_str());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match session.identity() {
        Some(identity) => print_identity(identity),
        None => println!(
            "\n  {} Signed in as {}\n",
            style("✓").green().bold(),
            style(session.user_id()).cyan()
        ),
    }
    println!(
        "  {}",
        style("Run `mindspace chat` to open the dashboard or `mindspace logout` to sign out").dim()
    );
    println!();
    Ok(())
}
