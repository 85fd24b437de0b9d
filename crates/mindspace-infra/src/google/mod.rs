//! GoogleIdentityProvider -- concrete [`IdentityProvider`] for Google OAuth2.
//!
//! Flow:
//!   1. Bind a loopback listener on an ephemeral port
//!   2. Hand the consent URL to the front end (which shows or opens it)
//!   3. Google redirects to `http://127.0.0.1:{port}/?code=...&state=...`
//!   4. Exchange the code for an access token
//!   5. `fetch_profile` reads the v1 userinfo endpoint with that token
//!
//! The client secret and tokens are wrapped in [`SecretString`] and never
//! logged.

pub mod callback;
pub mod types;

use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpListener;
use tracing::{debug, info};
use uuid::Uuid;

use mindspace_core::auth::provider::{AccessToken, IdentityProvider};
use mindspace_types::config::GoogleConfig;
use mindspace_types::error::{AuthError, ConfigError, ProfileFetchError};
use mindspace_types::identity::Identity;

use self::callback::wait_for_callback;
use self::types::{CallbackParams, TokenResponse};

/// Called with the consent URL once the loopback listener is ready.
pub type ConsentHandler = Box<dyn Fn(&reqwest::Url) + Send + Sync>;

/// Resolved OAuth client settings.
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl GoogleOAuthSettings {
    pub fn from_config(config: &GoogleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: config.require_client_id()?.to_string(),
            client_secret: SecretString::from(config.require_client_secret()?.to_string()),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
            scopes: config.scopes.clone(),
        })
    }
}

/// Google OAuth2 identity provider.
// No Debug derive: the settings hold the client secret.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    settings: GoogleOAuthSettings,
    on_consent_url: ConsentHandler,
}

impl GoogleIdentityProvider {
    pub fn new(settings: GoogleOAuthSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
            on_consent_url: Box::new(|url| info!(%url, "Open this URL to sign in")),
        }
    }

    /// Replace the default consent handler (which only logs the URL).
    pub fn with_consent_handler(mut self, handler: ConsentHandler) -> Self {
        self.on_consent_url = handler;
        self
    }

    fn consent_url(&self, redirect_uri: &str, state: &str) -> Result<reqwest::Url, AuthError> {
        reqwest::Url::parse_with_params(
            &self.settings.auth_url,
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", self.settings.scopes.as_str()),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AuthError::Provider(format!("invalid auth URL: {e}")))
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<AccessToken, AuthError> {
        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.expose_secret()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "token endpoint returned HTTP {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid token response: {e}")))?;
        debug!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            expires_in = token.expires_in,
            "Authorization code exchanged"
        );
        Ok(AccessToken::new(token.access_token))
    }
}

/// Turn the redirect's query parameters into an authorization code.
fn authorization_code(params: CallbackParams, expected_state: &str) -> Result<String, AuthError> {
    if let Some(error) = params.error {
        return Err(if error == "access_denied" {
            AuthError::Cancelled
        } else {
            AuthError::Provider(error)
        });
    }
    if params.state.as_deref() != Some(expected_state) {
        return Err(AuthError::Provider("state mismatch on OAuth callback".to_string()));
    }
    params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::Provider("no authorization code in callback".to_string()))
}

impl IdentityProvider for GoogleIdentityProvider {
    async fn authenticate(&self) -> Result<AccessToken, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| AuthError::Provider(format!("failed to bind loopback listener: {e}")))?;
        let port = listener
            .local_addr()
            .map_err(|e| AuthError::Provider(format!("failed to read listener port: {e}")))?
            .port();

        let redirect_uri = format!("http://127.0.0.1:{port}");
        let state = Uuid::new_v4().simple().to_string();
        let url = self.consent_url(&redirect_uri, &state)?;

        debug!(%redirect_uri, "Waiting for OAuth redirect");
        (self.on_consent_url)(&url);

        let params = wait_for_callback(listener, &state).await?;
        let code = authorization_code(params, &state)?;
        self.exchange_code(&code, &redirect_uri).await
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Identity, ProfileFetchError> {
        let response = self
            .client
            .get(&self.settings.userinfo_url)
            .query(&[("access_token", token.expose())])
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProfileFetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let identity: Identity = response
            .json()
            .await
            .map_err(|e| ProfileFetchError::Decode(e.to_string()))?;
        info!(user_id = %identity.id, "Fetched user profile");
        Ok(identity)
    }
}
