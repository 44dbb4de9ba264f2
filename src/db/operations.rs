use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::models::{Collection, NewUser, User};
use crate::db::store::UserStore;
use crate::Result;

const USER_COLUMNS: &str =
    "id, username, password_hash, email, favourites, history, created_at, updated_at";

/// Postgres-backed user store.
pub struct PgUserStore {
    pool: Arc<PgPool>,
}

impl PgUserStore {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        Ok(())
    }

    fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (id, username, password_hash, email) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .fetch_one(self.pool())
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        Ok(user)
    }

    async fn collection(&self, id: Uuid, collection: Collection) -> Result<Option<Vec<String>>> {
        let sql = format!("SELECT {col} FROM users WHERE id = $1", col = collection.column());
        let items = sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(items)
    }

    async fn add_to_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>> {
        // One statement, so concurrent adds on the same row serialize on the row lock.
        let sql = format!(
            "UPDATE users \
             SET {col} = CASE WHEN $2 = ANY({col}) THEN {col} ELSE array_append({col}, $2) END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {col}",
            col = collection.column()
        );
        let items = sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .bind(item)
            .fetch_optional(self.pool())
            .await?;

        Ok(items)
    }

    async fn remove_from_collection(
        &self,
        id: Uuid,
        collection: Collection,
        item: &str,
    ) -> Result<Option<Vec<String>>> {
        let sql = format!(
            "UPDATE users \
             SET {col} = array_remove({col}, $2), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {col}",
            col = collection.column()
        );
        let items = sqlx::query_scalar::<_, Vec<String>>(&sql)
            .bind(id)
            .bind(item)
            .fetch_optional(self.pool())
            .await?;

        Ok(items)
    }
}
