//! Application state wiring configuration, the session and the adapters.
//!
//! The session is restored eagerly. Remote adapters are built on demand so
//! commands that never talk to a service (`logout`, `open /`) work without
//! any configuration.

use std::path::{Path, PathBuf};

use mindspace_core::auth::login::LoginService;
use mindspace_core::auth::session::SessionStore;
use mindspace_infra::completion::HttpCompletionClient;
use mindspace_infra::config::{apply_env_overrides, load_config};
use mindspace_infra::filesystem::{FileSessionStorage, resolve_data_dir, storage_path};
use mindspace_infra::firebase::{ConfiguredProfileStore, FirebaseProfileStore};
use mindspace_infra::google::{ConsentHandler, GoogleIdentityProvider, GoogleOAuthSettings};
use mindspace_types::config::AppConfig;
use mindspace_types::error::ConfigError;

/// Login service pinned to the Google adapter. Profile sync goes to Firebase
/// when it is configured and reports a sync notice otherwise.
pub type ConcreteLoginService = LoginService<GoogleIdentityProvider, ConfiguredProfileStore>;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    pub session: SessionStore<FileSessionStorage>,
}

impl AppState {
    /// Resolve the data directory, load config and restore the session.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let mut config = load_config(&data_dir).await;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        tracing::debug!(data_dir = %data_dir.display(), ?config, "Configuration loaded");

        Ok(Self::with_config(&data_dir, config))
    }

    /// Build state from an already-loaded config.
    pub fn with_config(data_dir: &Path, config: AppConfig) -> Self {
        let mut session = SessionStore::new(FileSessionStorage::new(storage_path(data_dir)));
        session.restore();
        Self {
            data_dir: data_dir.to_path_buf(),
            config,
            session,
        }
    }

    pub fn profile_store(&self) -> Result<FirebaseProfileStore, ConfigError> {
        FirebaseProfileStore::from_config(&self.config.firebase)
    }

    pub fn completion_client(&self) -> Result<HttpCompletionClient, ConfigError> {
        HttpCompletionClient::from_config(&self.config.completion)
    }

    pub fn login_service(&self, on_consent_url: ConsentHandler) -> Result<ConcreteLoginService, ConfigError> {
        let settings = GoogleOAuthSettings::from_config(&self.config.google)?;
        let provider = GoogleIdentityProvider::new(settings).with_consent_handler(on_consent_url);
        let profiles = ConfiguredProfileStore::from_config(&self.config.firebase);
        Ok(LoginService::new(provider, profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindspace_core::repository::storage::SessionStorage;
    use mindspace_core::auth::session::SESSION_KEY;
    use mindspace_types::config::GoogleConfig;
    use tempfile::tempdir;

    #[test]
    fn test_with_config_restores_persisted_session() {
        let dir = tempdir().unwrap();
        FileSessionStorage::new(storage_path(dir.path()))
            .set(SESSION_KEY, "1093")
            .unwrap();

        let state = AppState::with_config(dir.path(), AppConfig::default());
        assert_eq!(state.session.current().unwrap().user_id().as_str(), "1093");
    }

    #[test]
    fn test_adapters_report_missing_configuration() {
        let dir = tempdir().unwrap();
        let state = AppState::with_config(dir.path(), AppConfig::default());

        assert!(matches!(
            state.completion_client(),
            Err(ConfigError::Missing("completion.endpoint"))
        ));
        assert!(matches!(
            state.login_service(Box::new(|_| {})),
            Err(ConfigError::Missing("google.client_id"))
        ));
    }

    #[test]
    fn test_login_without_firebase_still_builds() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            google: GoogleConfig {
                client_id: Some("client".to_string()),
                client_secret: Some("secret".to_string()),
                ..GoogleConfig::default()
            },
            ..AppConfig::default()
        };
        let state = AppState::with_config(dir.path(), config);

        assert!(state.profile_store().is_err());
        assert!(state.login_service(Box::new(|_| {})).is_ok());
    }
}
