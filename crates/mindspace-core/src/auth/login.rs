//! Login sequencing.
//!
//! `LoginService` runs consent → profile lookup → profile upsert → session
//! write, strictly in that order. Nothing is written until the identity is
//! fully resolved, and a failed profile upsert is reported without undoing
//! the login.

use thiserror::Error;
use tracing::{info, warn};

use mindspace_types::error::{AuthError, ProfileFetchError, StoreError};
use mindspace_types::identity::Identity;

use crate::auth::provider::IdentityProvider;
use crate::auth::session::SessionStore;
use crate::repository::profile::ProfileRepository;
use crate::repository::storage::SessionStorage;
use crate::route::Route;

/// Errors that abort a login before any state is written.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    ProfileFetch(#[from] ProfileFetchError),
}

impl LoginError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::Auth(e) => e.user_message(),
            LoginError::ProfileFetch(e) => e.user_message(),
        }
    }
}

/// Result of a completed login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub identity: Identity,
    /// Set when the profile record could not be written. The user is signed
    /// in regardless and should be told.
    pub profile_sync_error: Option<StoreError>,
    /// Where the view should navigate next.
    pub redirect: Route,
}

/// Orchestrates the identity provider and profile store for a login.
pub struct LoginService<P: IdentityProvider, R: ProfileRepository> {
    provider: P,
    profiles: R,
}

impl<P: IdentityProvider, R: ProfileRepository> LoginService<P, R> {
    pub fn new(provider: P, profiles: R) -> Self {
        Self { provider, profiles }
    }

    /// Access the profile repository.
    pub fn profiles(&self) -> &R {
        &self.profiles
    }

    /// Sign the user in and record the session in `session`.
    pub async fn login<S: SessionStorage>(
        &self,
        session: &mut SessionStore<S>,
    ) -> Result<LoginOutcome, LoginError> {
        let token = self.provider.authenticate().await.inspect_err(|e| {
            warn!(error = %e, "Login failed");
        })?;

        let identity = self.provider.fetch_profile(&token).await.inspect_err(|e| {
            warn!(error = %e, "Error fetching user profile");
        })?;

        let profile_sync_error = match self.profiles.upsert(&identity).await {
            Ok(()) => {
                info!(user_id = %identity.id, "User profile saved");
                None
            }
            Err(e) => {
                warn!(user_id = %identity.id, error = %e, "Error saving user profile");
                Some(e)
            }
        };

        session.login(identity.clone());

        Ok(LoginOutcome {
            identity,
            profile_sync_error,
            redirect: Route::Dashboard,
        })
    }
}
