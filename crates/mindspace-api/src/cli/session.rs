//! Session commands: `whoami`, `logout`, and profile hydration shared with
//! the login and dashboard views.

use console::style;
use dialoguer::Confirm;
use tracing::warn;

use mindspace_core::chat::dashboard::load_profile;
use mindspace_types::identity::{Identity, ProfileRecord};

use crate::state::AppState;

/// Fetch the profile record for the current session and attach it.
///
/// Returns `None` when signed out, when the profile store is not configured,
/// or when the record is missing or unreadable.
pub async fn hydrate_profile(state: &mut AppState) -> Option<ProfileRecord> {
    let user_id = state.session.current()?.user_id().clone();
    let store = match state.profile_store() {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "Profile store not configured, skipping profile load");
            return None;
        }
    };
    let record = load_profile(&store, &user_id).await?;
    state.session.attach_profile(&record);
    Some(record)
}

/// Styled "signed in" card: name and email.
pub fn print_identity(identity: &Identity) {
    let name = if identity.name.is_empty() {
        identity.id.as_str()
    } else {
        identity.name.as_str()
    };
    println!();
    println!(
        "  {} Signed in as {}",
        style("✓").green().bold(),
        style(name).cyan().bold()
    );
    if !identity.email.is_empty() {
        println!("    {}", style(&identity.email).dim());
    }
    println!();
}

pub fn identity_json(identity: Option<&Identity>, user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "signed_in": true,
        "id": user_id,
        "name": identity.map(|i| i.name.as_str()),
        "email": identity.map(|i| i.email.as_str()),
        "picture": identity.map(|i| i.picture_url.as_str()).filter(|p| !p.is_empty()),
    })
}

pub async fn whoami(state: &mut AppState, json: bool) -> anyhow::Result<()> {
    if state.session.current().is_none() {
        if json {
            println!("{}", serde_json::json!({ "signed_in": false }));
        } else {
            println!();
            println!(
                "  Not signed in. Run {} to sign in.",
                style("mindspace login").cyan()
            );
            println!();
        }
        return Ok(());
    }

    hydrate_profile(state).await;
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
        None => {
            println!();
            println!(
                "  {} Signed in as {}",
                style("✓").green().bold(),
                style(session.user_id()).cyan()
            );
            println!("    {}", style("Profile details unavailable").dim());
            println!();
        }
    }
    Ok(())
}

pub fn logout(state: &mut AppState, force: bool, json: bool) -> anyhow::Result<()> {
    let Some(current) = state.session.current() else {
        if json {
            println!("{}", serde_json::json!({ "signed_out": false }));
        } else {
            println!("\n  Not signed in.\n");
        }
        return Ok(());
    };

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Sign out {}?", current.user_id()))
            .default(true)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let previous = state.session.logout();
    if json {
        let id = previous.as_ref().map(|s| s.user_id().as_str());
        println!("{}", serde_json::json!({ "signed_out": true, "id": id }));
    } else {
        println!();
        println!("  {} Signed out.", style("✓").green().bold());
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindspace_types::config::AppConfig;
    use mindspace_types::identity::UserId;
    use tempfile::tempdir;

    #[test]
    fn test_identity_json_omits_empty_picture() {
        let identity = Identity {
            id: UserId::new("1093"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            picture_url: String::new(),
        };
        let value = identity_json(Some(&identity), "1093");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["email"], "ada@example.com");
        assert!(value["picture"].is_null());
    }

    #[test]
    fn test_identity_json_without_profile() {
        let value = identity_json(None, "1093");
        assert_eq!(value["id"], "1093");
        assert!(value["name"].is_null());
    }

    #[tokio::test]
    async fn test_hydrate_without_firebase_config_is_none() {
        let dir = tempdir().unwrap();
        let mut state = AppState::with_config(dir.path(), AppConfig::default());
        state.session.login(Identity {
            id: UserId::new("1093"),
            name: String::new(),
            email: String::new(),
            picture_url: String::new(),
        });
        assert!(hydrate_profile(&mut state).await.is_none());
    }

    #[test]
    fn test_forced_logout_clears_persisted_session() {
        let dir = tempdir().unwrap();
        let mut state = AppState::with_config(dir.path(), AppConfig::default());
        state.session.login(Identity {
            id: UserId::new("1093"),
            name: "Ada".to_string(),
            email: String::new(),
            picture_url: String::new(),
        });

        logout(&mut state, true, true).unwrap();

        let reopened = AppState::with_config(dir.path(), AppConfig::default());
        assert!(reopened.session.current().is_none());
    }
}
