//! In-process store used by tests and `CMS_STORE=memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KvStore;
use crate::errors::AppResult;

/// Ordered in-memory map. Keys list in ascending byte order, like the SQLite backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> AppResult<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();

        assert_eq!(store.get("python").await.unwrap(), None);

        store.put("python", "{}".to_string()).await.unwrap();
        assert_eq!(store.get("python").await.unwrap().as_deref(), Some("{}"));

        store.put("python", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("python").await.unwrap().as_deref(), Some("[]"));

        store.delete("python").await.unwrap();
        assert_eq!(store.get("python").await.unwrap(), None);

        // Deleting again is a no-op
        store.delete("python").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_keys_sorted() {
        let store = MemoryStore::new();
        store.put("nodejs", "1".to_string()).await.unwrap();
        store.put("aws", "2".to_string()).await.unwrap();
        store.put("python", "3".to_string()).await.unwrap();

        assert_eq!(
            store.list_keys().await.unwrap(),
            vec!["aws", "nodejs", "python"]
        );
    }
}
