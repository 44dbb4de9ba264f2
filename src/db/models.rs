use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub favourites: Vec<String>,
    pub history: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn items(&self, collection: Collection) -> &[String] {
        match collection {
            Collection::Favourites => &self.favourites,
            Collection::History => &self.history,
        }
    }

    pub fn items_mut(&mut self, collection: Collection) -> &mut Vec<String> {
        match collection {
            Collection::Favourites => &mut self.favourites,
            Collection::History => &mut self.history,
        }
    }
}

/// A user about to be inserted. The store assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// One of the per-user item sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Favourites,
    History,
}

impl Collection {
    /// Column holding this set in the `users` table.
    pub fn column(self) -> &'static str {
        match self {
            Collection::Favourites => "favourites",
            Collection::History => "history",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
