//! Database module for the user list server
//!
//! User records live behind the [`UserStore`] trait: Postgres in production,
//! an in-process map for tests and local runs.

pub mod memory;
pub mod models;
pub mod operations;
pub mod store;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use memory::MemoryStore;
pub use models::{Collection, NewUser, User};
pub use operations::PgUserStore;
pub use store::UserStore;

use crate::config::DatabaseConfig;
use crate::Result;

/// Open the store named by `config.url` and bring its schema up to date.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn UserStore>> {
    if config.is_memory() {
        info!("Using in-memory user store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgUserStore::new_with_options(
        &config.url,
        config.max_connections,
        Duration::from_secs(config.acquire_timeout_secs),
    )
    .await?;
    store.migrate().await?;
    info!("Connected to Postgres user store");

    Ok(Arc::new(store))
}
