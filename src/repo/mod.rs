//! Content repositories for the posts and tags collections.
//!
//! Every operation re-reads the store; nothing is cached between calls.
//! Single-key reads return [`Lookup`] so an empty filter result can never be
//! confused with a missing key.

mod posts;
mod tags;

pub use posts::{PostMap, PostRepository};
pub use tags::{TagMap, TagRepository};

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppResult;
use crate::store::KvStore;

/// Result of addressing a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn map<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

#[cfg(test)]
impl<T: std::fmt::Debug> Lookup<T> {
    pub fn unwrap_found(self) -> T {
        match self {
            Lookup::Found(value) => value,
            Lookup::NotFound => panic!("expected Lookup::Found"),
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::NotFound, Lookup::Found)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Typed JSON documents on top of a raw [`KvStore`].
struct Documents<T> {
    store: Arc<dyn KvStore>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Documents<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            _doc: PhantomData,
        }
    }

    async fn fetch(&self, key: &str) -> AppResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Whether `key` holds any value, decodable or not.
    async fn contains(&self, key: &str) -> AppResult<bool> {
        Ok(self.store.get(key).await?.is_some())
    }

    async fn save(&self, key: &str, doc: &T) -> AppResult<()> {
        let raw = serde_json::to_string(doc)?;
        self.store.put(key, raw).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.store.delete(key).await
    }

    /// Every document, fetched concurrently. Keys deleted between the listing
    /// and the fetch are skipped.
    async fn fetch_all(&self) -> AppResult<BTreeMap<String, T>> {
        let keys = self.store.list_keys().await?;
        let fetched = join_all(keys.iter().map(|key| self.fetch(key))).await;

        let mut docs = BTreeMap::new();
        for (key, doc) in keys.into_iter().zip(fetched) {
            if let Some(doc) = doc? {
                docs.insert(key, doc);
            }
        }
        Ok(docs)
    }

    /// Delete every key concurrently and return the keys in listing order.
    ///
    /// All deletes settle before any failure is reported; completed deletes
    /// are not rolled back.
    async fn remove_all(&self) -> AppResult<Vec<String>> {
        let keys = self.store.list_keys().await?;
        let results = join_all(keys.iter().map(|key| self.store.delete(key))).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::error!("{} of {} deletes failed", failed, keys.len());
        }
        results.into_iter().collect::<AppResult<Vec<()>>>()?;

        Ok(keys)
    }
}
