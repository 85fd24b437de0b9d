//! Navigable views and the session guard in front of the dashboard.
//!
//! The chat pipeline can only be built from an [`AuthenticatedSession`], and
//! the only way to get one is through [`authorize`], so every session write
//! happens before the dashboard is reachable.

use std::fmt;

use thiserror::Error;

use mindspace_types::identity::{Identity, UserId};

use crate::auth::session::SessionStore;
use crate::repository::storage::SessionStorage;

/// The three views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Whether the view needs a signed-in user.
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Dashboard)
    }

    /// Match a path, ignoring any query string, fragment or trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no view at '{0}'")]
    NotFound(String),
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// The originally requested view when the guard redirected.
    pub redirected_from: Option<Route>,
}

/// Resolve `path` to the view that should render for the current session.
pub fn navigate<S: SessionStorage>(
    path: &str,
    session: &SessionStore<S>,
) -> Result<Navigation, RouteError> {
    let requested = Route::from_path(path).ok_or_else(|| RouteError::NotFound(path.to_string()))?;
    if requested.requires_session() && session.current().is_none() {
        tracing::debug!(path, "No session, redirecting to login");
        return Ok(Navigation {
            route: Route::Login,
            redirected_from: Some(requested),
        });
    }
    Ok(Navigation {
        route: requested,
        redirected_from: None,
    })
}

/// Proof that a session existed when the dashboard was entered.
///
/// A snapshot: later logouts do not affect a pipeline already holding one.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    user_id: UserId,
    identity: Option<Identity>,
}

impl AuthenticatedSession {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Hand out an [`AuthenticatedSession`] if someone is signed in.
pub fn authorize<S: SessionStorage>(session: &SessionStore<S>) -> Option<AuthenticatedSession> {
    session.current().map(|s| AuthenticatedSession {
        user_id: s.user_id().clone(),
        identity: s.identity().cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::storage::MemoryStorage;

    fn signed_in() -> SessionStore<MemoryStorage> {
        let mut store = SessionStore::new(MemoryStorage::new());
        store.login(Identity {
            id: UserId::new("1093"),
            name: "Ada".to_string(),
            email: String::new(),
            picture_url: String::new(),
        });
        store
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Landing));
        assert_eq!(Route::from_path(""), Some(Route::Landing));
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/dashboard?tab=chat"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/terms"), None);
    }

    #[test]
    fn test_path_roundtrip() {
        for route in [Route::Landing, Route::Login, Route::Dashboard] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_unauthenticated_dashboard_redirects_to_login() {
        let store = SessionStore::new(MemoryStorage::new());
        let nav = navigate("/dashboard", &store).unwrap();
        assert_eq!(nav.route, Route::Login);
        assert_eq!(nav.redirected_from, Some(Route::Dashboard));
    }

    #[test]
    fn test_authenticated_dashboard_renders() {
        let store = signed_in();
        let nav = navigate("/dashboard", &store).unwrap();
        assert_eq!(nav.route, Route::Dashboard);
        assert!(nav.redirected_from.is_none());
    }

    #[test]
    fn test_public_views_never_redirect() {
        let store = SessionStore::new(MemoryStorage::new());
        assert_eq!(navigate("/", &store).unwrap().route, Route::Landing);
        assert_eq!(navigate("/login", &store).unwrap().route, Route::Login);
    }

    #[test]
    fn test_unknown_path() {
        let store = SessionStore::new(MemoryStorage::new());
        assert_eq!(
            navigate("/privacy", &store),
            Err(RouteError::NotFound("/privacy".to_string()))
        );
    }

    #[test]
    fn test_authorize() {
        assert!(authorize(&SessionStore::new(MemoryStorage::new())).is_none());
        let auth = authorize(&signed_in()).unwrap();
        assert_eq!(auth.user_id().as_str(), "1093");
        assert_eq!(auth.identity().unwrap().name, "Ada");
    }
}
