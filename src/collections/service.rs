use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::db::{Collection, UserStore};
use crate::error::AppError;
use crate::Result;

/// List, add and remove for a user's favourites and history sets.
///
/// Add and remove are idempotent and delegate to the store's atomic set
/// operations, so concurrent requests for one user converge.
pub struct CollectionService {
    store: Arc<dyn UserStore>,
}

fn user_not_found(user_id: Uuid) -> AppError {
    AppError::NotFound(format!("Unable to find user {}", user_id))
}

// Item ids are opaque; only an empty id is refused.
fn require_item(item_id: &str) -> Result<()> {
    if item_id.is_empty() {
        return Err(AppError::Validation("Missing item id".into()));
    }
    Ok(())
}

impl CollectionService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: Uuid, collection: Collection) -> Result<Vec<String>> {
        self.store
            .collection(user_id, collection)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }

    pub async fn add(
        &self,
        user_id: Uuid,
        collection: Collection,
        item_id: &str,
    ) -> Result<Vec<String>> {
        require_item(item_id)?;
        let items = self
            .store
            .add_to_collection(user_id, collection, item_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        debug!("Added {} to {} of user {}", item_id, collection, user_id);
        Ok(items)
    }

    pub async fn remove(
        &self,
        user_id: Uuid,
        collection: Collection,
        item_id: &str,
    ) -> Result<Vec<String>> {
        require_item(item_id)?;
        let items = self
            .store
            .remove_from_collection(user_id, collection, item_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        debug!("Removed {} from {} of user {}", item_id, collection, user_id);
        Ok(items)
    }
}
