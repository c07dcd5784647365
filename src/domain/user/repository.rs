use async_trait::async_trait;
use uuid::Uuid;

use super::{User, UserPatch};
use crate::domain::DomainResult;

/// Persistence port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in storage order.
    async fn find_all(&self) -> DomainResult<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Persist a complete record under `user.id`.
    async fn insert(&self, user: User) -> DomainResult<User>;

    /// Set the present fields of `patch` on the row keyed by `id`.
    ///
    /// Returns the number of rows matched. An empty patch writes nothing and
    /// reports whether the row exists.
    async fn update_fields(&self, id: Uuid, patch: &UserPatch) -> DomainResult<u64>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
}
