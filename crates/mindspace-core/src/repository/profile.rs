//! Profile repository trait definition.

use mindspace_types::error::StoreError;
use mindspace_types::identity::{Identity, ProfileRecord, UserId};

/// Trait for the remote user profile store (`users/{id}` records).
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in mindspace-infra.
pub trait ProfileRepository: Send + Sync {
    /// Write the identity's profile record, replacing any previous value.
    fn upsert(
        &self,
        identity: &Identity,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read a profile record. Returns None if no record exists for the id.
    fn fetch(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<ProfileRecord>, StoreError>> + Send;
}
