//! Signed-in user identity and the remote profile record derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Profile attributes returned by the identity provider's userinfo endpoint.
///
/// Obtained once per login and never mutated afterwards. Google omits `name`
/// and `picture` for some account types, so those default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Avatar URL (`picture` on the wire).
    #[serde(rename = "picture", default)]
    pub picture_url: String,
}

/// The record stored at `users/{id}` in the profile store.
///
/// Field order matches the stored JSON document: `{name, email, id, picture}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub id: UserId,
    #[serde(default)]
    pub picture: String,
}

impl From<&Identity> for ProfileRecord {
    fn from(identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            id: identity.id.clone(),
            picture: identity.picture_url.clone(),
        }
    }
}
