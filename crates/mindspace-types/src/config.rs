//! Configuration types for MindSpace.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field has
//! a default so an absent file yields a usable (if unconfigured) client;
//! values a command actually needs are checked with the `require_*` helpers.

use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration, loaded from `~/.mindspace/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Google OAuth client settings.
#[derive(Deserialize)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: String,
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v1/userinfo".to_string()
}

fn default_scopes() -> String {
    "openid email profile".to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            scopes: default_scopes(),
        }
    }
}

// Manual Debug so the client secret never lands in logs.
impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl GoogleConfig {
    pub fn require_client_id(&self) -> Result<&str, ConfigError> {
        non_empty(self.client_id.as_deref(), "google.client_id")
    }

    pub fn require_client_secret(&self) -> Result<&str, ConfigError> {
        non_empty(self.client_secret.as_deref(), "google.client_secret")
    }
}

/// Firebase Realtime Database settings.
#[derive(Default, Deserialize)]
pub struct FirebaseConfig {
    /// e.g. `https://mindspace-5af03-default-rtdb.firebaseio.com/`
    pub database_url: Option<String>,
    /// Database secret or ID token, sent as the `auth` query parameter.
    pub auth_token: Option<String>,
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FirebaseConfig {
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        let url = non_empty(self.database_url.as_deref(), "firebase.database_url")?;
        require_http("firebase.database_url", url)
    }
}

/// Chat completion service settings.
#[derive(Debug, Default, Deserialize)]
pub struct CompletionConfig {
    pub endpoint: Option<String>,
}

impl CompletionConfig {
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        let url = non_empty(self.endpoint.as_deref(), "completion.endpoint")?;
        require_http("completion.endpoint", url)
    }
}

fn non_empty<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(field)),
    }
}

fn require_http<'a>(field: &'static str, url: &'a str) -> Result<&'a str, ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("'{url}' is not an http(s) URL"),
        })
    }
}
