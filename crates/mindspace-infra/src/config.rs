//! Configuration loader for MindSpace.
//!
//! Reads `config.toml` from the data directory (`~/.mindspace/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::Path;

use mindspace_types::config::AppConfig;

use crate::filesystem::config_path;

pub const ENV_GOOGLE_CLIENT_ID: &str = "MINDSPACE_GOOGLE_CLIENT_ID";
pub const ENV_GOOGLE_CLIENT_SECRET: &str = "MINDSPACE_GOOGLE_CLIENT_SECRET";
pub const ENV_FIREBASE_URL: &str = "MINDSPACE_FIREBASE_URL";
pub const ENV_FIREBASE_TOKEN: &str = "MINDSPACE_FIREBASE_TOKEN";
pub const ENV_COMPLETION_URL: &str = "MINDSPACE_COMPLETION_URL";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Overlay environment variables on top of file configuration.
///
/// `lookup` is usually `|key| std::env::var(key).ok()`. Blank values are
/// ignored so an exported-but-empty variable does not erase the file value.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_GOOGLE_CLIENT_ID) {
        config.google.client_id = Some(v);
    }
    if let Some(v) = get(ENV_GOOGLE_CLIENT_SECRET) {
        config.google.client_secret = Some(v);
    }
    if let Some(v) = get(ENV_FIREBASE_URL) {
        config.firebase.database_url = Some(v);
    }
    if let Some(v) = get(ENV_FIREBASE_TOKEN) {
        config.firebase.auth_token = Some(v);
    }
    if let Some(v) = get(ENV_COMPLETION_URL) {
        config.completion.endpoint = Some(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert!(config.google.client_id.is_none());
        assert!(config.completion.endpoint.is_none());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[google]
client_id = "abc.apps.googleusercontent.com"

[completion]
endpoint = "http://localhost:8000/chat"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(
            config.google.client_id.as_deref(),
            Some("abc.apps.googleusercontent.com")
        );
        assert_eq!(
            config.completion.endpoint.as_deref(),
            Some("http://localhost:8000/chat")
        );
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(config.google.client_id.is_none());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
[google]
client_id = "from-file"

[firebase]
database_url = "https://file.firebaseio.com"
"#,
        )
        .unwrap();

        let env = HashMap::from([
            (ENV_GOOGLE_CLIENT_ID, "from-env"),
            (ENV_FIREBASE_URL, "  "),
            (ENV_COMPLETION_URL, "http://127.0.0.1:9000/chat"),
        ]);
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.google.client_id.as_deref(), Some("from-env"));
        assert_eq!(
            config.firebase.database_url.as_deref(),
            Some("https://file.firebaseio.com")
        );
        assert_eq!(
            config.completion.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/chat")
        );
        assert!(config.google.client_secret.is_none());
    }
}
