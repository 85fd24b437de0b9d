//! Firebase Realtime Database profile store.
//!
//! Records live at `users/{id}` and are addressed through the database's
//! REST interface: `PUT|GET {database_url}/users/{id}.json`. A GET for a
//! path with no data returns the JSON literal `null`.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use mindspace_core::repository::profile::ProfileRepository;
use mindspace_types::config::FirebaseConfig;
use mindspace_types::error::{ConfigError, StoreError};
use mindspace_types::identity::{Identity, ProfileRecord, UserId};

/// Characters Firebase forbids in a path segment.
const FORBIDDEN_KEY_CHARS: &[char] = &['.', '#', '$', '[', ']', '/'];

pub struct FirebaseProfileStore {
    client: reqwest::Client,
    database_url: String,
    auth_token: Option<SecretString>,
}

impl FirebaseProfileStore {
    pub fn new(database_url: impl Into<String>, auth_token: Option<SecretString>) -> Self {
        let database_url = database_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            database_url,
            auth_token,
        }
    }

    pub fn from_config(config: &FirebaseConfig) -> Result<Self, ConfigError> {
        let url = config.require_database_url()?;
        let token = config
            .auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_string()));
        Ok(Self::new(url, token))
    }

    /// `{database_url}/users/{id}.json`, with the id pushed as a single
    /// percent-encoded path segment.
    fn record_url(&self, user_id: &UserId) -> Result<reqwest::Url, StoreError> {
        validate_key(user_id.as_str())?;
        let invalid = |reason: String| StoreError::InvalidKey(format!("{}: {reason}", user_id.as_str()));

        let mut url = reqwest::Url::parse(&self.database_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("database URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("users")
            .push(&format!("{}.json", user_id.as_str()));
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token.expose_secret());
        }
        Ok(url)
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.contains(FORBIDDEN_KEY_CHARS)
        || key.chars().any(char::is_control);
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {status}: {body}")
}

impl ProfileRepository for FirebaseProfileStore {
    async fn upsert(&self, identity: &Identity) -> Result<(), StoreError> {
        let url = self.record_url(&identity.id)?;
        let record = ProfileRecord::from(identity);

        let response = self
            .client
            .put(url)
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        if !response.status().is_success() {
            let detail = error_body(response).await;
            warn!(user_id = %identity.id, %detail, "Profile write rejected");
            return Err(StoreError::Write(detail));
        }
        debug!(user_id = %identity.id, "Profile record written");
        Ok(())
    }

    async fn fetch(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, StoreError> {
        let url = self.record_url(user_id)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Read(error_body(response).await));
        }

        response
            .json::<Option<ProfileRecord>>()
            .await
            .map_err(|e| StoreError::Read(format!("invalid profile record: {e}")))
    }
}

/// Profile store selected from configuration.
///
/// Profile sync is best-effort, so a missing or invalid `[firebase]` section
/// does not block sign-in: writes report the reason as a
/// [`StoreError::Write`] and reads as a [`StoreError::Read`].
pub enum ConfiguredProfileStore {
    Firebase(FirebaseProfileStore),
    Disabled(String),
}

impl ConfiguredProfileStore {
    pub fn from_config(config: &FirebaseConfig) -> Self {
        match FirebaseProfileStore::from_config(config) {
            Ok(store) => Self::Firebase(store),
            Err(e) => {
                warn!(error = %e, "Profile store not configured, profile sync disabled");
                Self::Disabled(e.to_string())
            }
        }
    }
}

impl ProfileRepository for ConfiguredProfileStore {
    async fn upsert(&self, identity: &Identity) -> Result<(), StoreError> {
        match self {
            Self::Firebase(store) => store.upsert(identity).await,
            Self::Disabled(reason) => Err(StoreError::Write(reason.clone())),
        }
    }

    async fn fetch(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, StoreError> {
        match self {
            Self::Firebase(store) => store.fetch(user_id).await,
            Self::Disabled(reason) => Err(StoreError::Read(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Db = Arc<Mutex<HashMap<String, Value>>>;

    /// Minimal stand-in for the Realtime Database REST API.
    async fn fake_database(required_auth: Option<&'static str>) -> (String, Db) {
        let db: Db = Arc::default();

        async fn read(
            State((db, auth)): State<(Db, Option<&'static str>)>,
            Path(file): Path<String>,
            Query(q): Query<HashMap<String, String>>,
        ) -> (StatusCode, Json<Value>) {
            if auth.is_some() && q.get("auth").map(String::as_str) != auth {
                return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "Permission denied"})));
            }
            let key = file.trim_end_matches(".json");
            let value = db.lock().unwrap().get(key).cloned().unwrap_or(Value::Null);
            (StatusCode::OK, Json(value))
        }

        async fn write(
            State((db, auth)): State<(Db, Option<&'static str>)>,
            Path(file): Path<String>,
            Query(q): Query<HashMap<String, String>>,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            if auth.is_some() && q.get("auth").map(String::as_str) != auth {
                return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "Permission denied"})));
            }
            let key = file.trim_end_matches(".json").to_string();
            db.lock().unwrap().insert(key, body.clone());
            (StatusCode::OK, Json(body))
        }

        let router = Router::new()
            .route("/users/{file}", get(read).put(write))
            .with_state((db.clone(), required_auth));
        (spawn_server(router).await, db)
    }

    fn ada() -> Identity {
        Identity {
            id: UserId::new("1093"),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            picture_url: "https://example.com/ada.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_unknown_user_is_none() {
        let (base, _db) = fake_database(None).await;
        let store = FirebaseProfileStore::new(base, None);

        let record = store.fetch(&UserId::new("never-seen")).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_upsert_writes_record_shape() {
        let (base, db) = fake_database(None).await;
        let store = FirebaseProfileStore::new(format!("{base}/"), None);

        store.upsert(&ada()).await.unwrap();

        let stored = db.lock().unwrap().get("1093").cloned().unwrap();
        assert_eq!(
            stored,
            serde_json::json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "id": "1093",
                "picture": "https://example.com/ada.png"
            })
        );
    }

    #[tokio::test]
    async fn test_upsert_then_fetch_and_overwrite() {
        let (base, _db) = fake_database(None).await;
        let store = FirebaseProfileStore::new(base, None);

        store.upsert(&ada()).await.unwrap();
        let mut renamed = ada();
        renamed.name = "Countess of Lovelace".to_string();
        store.upsert(&renamed).await.unwrap();

        let record = store.fetch(&UserId::new("1093")).await.unwrap().unwrap();
        assert_eq!(record.name, "Countess of Lovelace");
        assert_eq!(record.picture, "https://example.com/ada.png");
    }

    #[tokio::test]
    async fn test_auth_token_sent_as_query_parameter() {
        let (base, _db) = fake_database(Some("db-secret")).await;

        let anonymous = FirebaseProfileStore::new(base.clone(), None);
        assert!(matches!(anonymous.upsert(&ada()).await, Err(StoreError::Write(_))));
        assert!(matches!(
            anonymous.fetch(&UserId::new("1093")).await,
            Err(StoreError::Read(_))
        ));

        let authed = FirebaseProfileStore::new(base, Some(SecretString::from("db-secret".to_string())));
        authed.upsert(&ada()).await.unwrap();
        assert!(authed.fetch(&UserId::new("1093")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected_before_request() {
        // Unroutable base: any request would fail with Write/Read instead.
        let store = FirebaseProfileStore::new("http://127.0.0.1:1", None);
        for key in ["", "a.b", "a/b", "a#b", "a$b", "a[0]"] {
            let mut identity = ada();
            identity.id = UserId::new(key);
            assert!(
                matches!(store.upsert(&identity).await, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_ids_with_url_syntax_stay_in_their_own_record() {
        let (base, db) = fake_database(None).await;
        let store = FirebaseProfileStore::new(base, None);

        let mut victim = ada();
        victim.id = UserId::new("victim");
        store.upsert(&victim).await.unwrap();

        for key in ["victim?x", "a%2Fb", "two words"] {
            let mut identity = ada();
            identity.id = UserId::new(key);
            store.upsert(&identity).await.unwrap();

            let record = store.fetch(&UserId::new(key)).await.unwrap().unwrap();
            assert_eq!(record.id.as_str(), key);
        }

        let db = db.lock().unwrap();
        assert_eq!(db["victim"]["id"], "victim");
        assert_eq!(db["victim?x"]["id"], "victim?x");
        assert_eq!(db["a%2Fb"]["id"], "a%2Fb");
        assert!(!db.contains_key("a/b"));
        assert_eq!(db.len(), 4);
    }

    #[test]
    fn test_record_url_encodes_id_segment() {
        let store = FirebaseProfileStore::new(
            "https://demo.firebaseio.com/",
            Some(SecretString::from("s3cret".to_string())),
        );
        let url = store.record_url(&UserId::new("victim?x")).unwrap();
        assert_eq!(url.path(), "/users/victim%3Fx.json");
        assert_eq!(url.query(), Some("auth=s3cret"));
    }

    #[tokio::test]
    async fn test_disabled_store_reports_reason() {
        let store = ConfiguredProfileStore::from_config(&FirebaseConfig::default());
        assert!(matches!(store, ConfiguredProfileStore::Disabled(_)));

        let err = store.upsert(&ada()).await.unwrap_err();
        assert!(matches!(&err, StoreError::Write(reason) if reason.contains("firebase.database_url")));
        assert_eq!(err.user_message(), "Error saving user data. Please try again.");
        assert!(matches!(
            store.fetch(&UserId::new("1093")).await,
            Err(StoreError::Read(_))
        ));
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = FirebaseConfig::default();
        assert!(matches!(
            FirebaseProfileStore::from_config(&config),
            Err(ConfigError::Missing("firebase.database_url"))
        ));
    }
}
