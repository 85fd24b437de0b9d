//! CompletionClient trait definition.

use mindspace_types::error::CompletionError;
use mindspace_types::identity::UserId;

/// Trait for the remote chat completion service.
///
/// One call per user turn. Implementations live in mindspace-infra.
pub trait CompletionClient: Send + Sync {
    /// Send the user's text and return the assistant reply.
    fn complete(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}
