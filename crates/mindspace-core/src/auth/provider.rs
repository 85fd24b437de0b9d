//! IdentityProvider trait definition.

use secrecy::{ExposeSecret, SecretString};

use mindspace_types::error::{AuthError, ProfileFetchError};
use mindspace_types::identity::Identity;

/// OAuth access token returned by the consent flow.
///
/// Wrapped in [`SecretString`] so it never shows up in `Debug` output or logs.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building request headers only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Trait for identity provider backends (Google OAuth2).
///
/// `fetch_profile` must only be called with a token obtained from a
/// successful `authenticate`.
pub trait IdentityProvider: Send + Sync {
    /// Run the provider-hosted consent flow and return an access token.
    ///
    /// Suspends until the user finishes (or abandons) the consent screen.
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<AccessToken, AuthError>> + Send;

    /// Look up the signed-in user's profile attributes.
    fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> impl std::future::Future<Output = Result<Identity, ProfileFetchError>> + Send;
}
