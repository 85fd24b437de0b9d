use thiserror::Error;

use crate::chat::COMPLETION_ERROR_TEXT;

/// Errors from the provider-hosted consent flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login cancelled by user")]
    Cancelled,

    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Message shown to the user; the cause is only logged.
    pub fn user_message(&self) -> &'static str {
        "Login failed. Please try again."
    }
}

/// Errors fetching the signed-in user's profile from the provider.
#[derive(Debug, Error)]
pub enum ProfileFetchError {
    #[error("profile request failed: {0}")]
    Network(String),

    #[error("profile endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid profile response: {0}")]
    Decode(String),
}

impl ProfileFetchError {
    pub fn user_message(&self) -> &'static str {
        "Error fetching user profile. Please try again."
    }
}

/// Errors from the remote profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store write failed: {0}")]
    Write(String),

    #[error("profile store read failed: {0}")]
    Read(String),

    #[error("invalid profile key '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Read(_) => "Error loading user data.",
            StoreError::Write(_) | StoreError::InvalidKey(_) => {
                "Error saving user data. Please try again."
            }
        }
    }
}

/// Errors from the chat completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Network(String),

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion response has no 'response' field")]
    MissingResponse,
}

impl CompletionError {
    pub fn user_message(&self) -> &'static str {
        COMPLETION_ERROR_TEXT
    }
}

/// Errors from client-side durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("storage file is corrupt: {0}")]
    Corrupt(String),
}

/// Errors validating configuration needed by a command.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value '{0}'")]
    Missing(&'static str),

    #[error("invalid configuration value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
