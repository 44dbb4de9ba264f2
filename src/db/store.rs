use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Collection, NewUser, User};
use crate::Result;

/// Data-access layer for user records.
///
/// Collection mutations are single store operations: implementations must
/// apply the set-add or set-remove atomically against the one column, never
/// by reading the whole record and writing it back. `Ok(None)` from any of
/// the collection methods means the user does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `DatabaseError::Duplicate` when the
    /// username is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn collection(&self, id: Uuid, collection: Collection) -> Result<Option<Vec<String>>>;

    /// Add `item` unless already present, returning the resulting set.
    async fn add_to_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>>;

    /// Remove `item` if present, returning the resulting set.
    async fn remove_from_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>>;
}
