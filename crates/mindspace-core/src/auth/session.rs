//! Session store for the signed-in user.
//!
//! Holds at most one active session and mirrors its user id into durable
//! storage so the next start can restore it. All mutations are synchronous;
//! storage failures are logged and otherwise ignored.

use tracing::{debug, info, warn};

use mindspace_types::identity::{Identity, ProfileRecord, UserId};

use crate::repository::storage::SessionStorage;

/// Storage key holding the signed-in user's id.
pub const SESSION_KEY: &str = "userId";

/// The active session.
///
/// A session created by a fresh login carries the full identity. A session
/// restored from storage only knows the user id until a profile record is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    identity: Option<Identity>,
}

impl Session {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Owner of the process-wide session state.
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    current: Option<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Create an uninitialized store. Call [`restore`](Self::restore) to load
    /// a persisted session.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Access the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Populate the session from the persisted user id, if there is one.
    pub fn restore(&mut self) {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(id)) if !id.trim().is_empty() => {
                debug!(user_id = %id, "Session restored from storage");
                self.current = Some(Session {
                    user_id: UserId::new(id),
                    identity: None,
                });
            }
            Ok(_) => debug!("No persisted session"),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session, starting signed out");
                self.current = None;
            }
        }
    }

    /// Make `identity` the active session and persist its id.
    pub fn login(&mut self, identity: Identity) {
        if let Err(e) = self.storage.set(SESSION_KEY, identity.id.as_str()) {
            warn!(user_id = %identity.id, error = %e, "Failed to persist session");
        }
        info!(user_id = %identity.id, "Signed in");
        self.current = Some(Session {
            user_id: identity.id.clone(),
            identity: Some(identity),
        });
    }

    /// Clear the session and forget the persisted id.
    ///
    /// Returns the session that was active, if any.
    pub fn logout(&mut self) -> Option<Session> {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            warn!(error = %e, "Failed to remove persisted session");
        }
        let previous = self.current.take();
        if let Some(session) = &previous {
            info!(user_id = %session.user_id, "Signed out");
        }
        previous
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Fill in the identity of a restored session from its profile record.
    ///
    /// Ignored when the record belongs to another user or the session already
    /// has an identity from a fresh login.
    pub fn attach_profile(&mut self, record: &ProfileRecord) {
        if let Some(session) = self.current.as_mut() {
            if session.user_id == record.id && session.identity.is_none() {
                session.identity = Some(Identity {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    email: record.email.clone(),
                    picture_url: record.picture.clone(),
                });
            }
        }
    }
}
