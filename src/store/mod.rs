//! Key-value store adapters.
//!
//! Each collection (posts, tags) owns one independent [`KvStore`]. Values are
//! opaque JSON text; the repository layer is responsible for their shape.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{init_database, SqliteStore};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreBackend;
use crate::errors::AppResult;

/// Minimal key-value capability the repositories are written against.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored at `key`, if any.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Insert or overwrite the value at `key`.
    async fn put(&self, key: &str, value: String) -> AppResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// All keys currently stored, in the backend's listing order.
    async fn list_keys(&self) -> AppResult<Vec<String>>;
}

/// The two collection stores the service runs on.
pub struct Stores {
    pub posts: Arc<dyn KvStore>,
    pub tags: Arc<dyn KvStore>,
}

/// Open the posts and tags stores on the configured backend.
pub async fn open_stores(backend: &StoreBackend) -> AppResult<Stores> {
    match backend {
        StoreBackend::Sqlite(db_path) => {
            let pool = init_database(db_path).await?;
            Ok(Stores {
                posts: Arc::new(SqliteStore::new(pool.clone(), "posts")),
                tags: Arc::new(SqliteStore::new(pool, "tags")),
            })
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Stores {
                posts: Arc::new(MemoryStore::new()),
                tags: Arc::new(MemoryStore::new()),
            })
        }
    }
}
