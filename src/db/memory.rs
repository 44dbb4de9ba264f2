use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Collection, NewUser, User};
use crate::db::store::UserStore;
use crate::error::DatabaseError;
use crate::Result;

/// In-process user store. Every mutation happens under a single write lock,
/// which gives the same atomic set semantics as the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    async fn mutate<F>(&self, id: Uuid, collection: Collection, f: F) -> Option<Vec<String>>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        f(user.items_mut(collection));
        user.updated_at = Utc::now();
        Some(user.items(collection).to_vec())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Duplicate.into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            email: new_user.email.clone(),
            favourites: Vec::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn collection(&self, id: Uuid, collection: Collection) -> Result<Option<Vec<String>>> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|u| u.items(collection).to_vec()))
    }

    async fn add_to_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>> {
        Ok(self
            .mutate(id, collection, |items| {
                if !items.iter().any(|i| i == item) {
                    items.push(item.to_string());
                }
            })
            .await)
    }

    async fn remove_from_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>> {
        Ok(self
            .mutate(id, collection, |items| items.retain(|i| i != item))
            .await)
    }
}
