//! Posts repository.
//!
//! A post's key is its creation time in epoch milliseconds, so two posts
//! created within the same millisecond share a key and the later one wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;

use super::{now_millis, Documents, Lookup};
use crate::errors::AppResult;
use crate::models::{CreatePostRequest, Entry, Post, UpdatePostRequest};
use crate::store::KvStore;

/// Posts keyed by id.
pub type PostMap = BTreeMap<String, Post>;

pub struct PostRepository {
    docs: Documents<Post>,
}

impl PostRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            docs: Documents::new(store),
        }
    }

    /// Create a post stamped with the current local time.
    pub async fn create(&self, request: CreatePostRequest) -> AppResult<PostMap> {
        let now = Local::now();
        let created_at = now.timestamp_millis();
        let id = created_at.to_string();

        let post = Post {
            tags: request.tags,
            title: request.title,
            body: request.body,
            is_draft: request.is_draft,
            created_at,
            entry: Entry::from_datetime(&now),
            updated_at: None,
        };

        self.docs.save(&id, &post).await?;
        tracing::info!("Created post {}", id);

        Ok(PostMap::from([(id, post)]))
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Lookup<PostMap>> {
        let post = self.docs.fetch(id).await?;
        Ok(Lookup::from(post).map(|post| PostMap::from([(id.to_string(), post)])))
    }

    pub async fn get_all(&self) -> AppResult<PostMap> {
        self.docs.fetch_all().await
    }

    /// Posts created on the given local calendar day.
    pub async fn get_by_entry(&self, year: &str, month: &str, day: &str) -> AppResult<PostMap> {
        let mut posts = self.get_all().await?;
        posts.retain(|_, post| post.entry.matches(year, month, day));
        Ok(posts)
    }

    /// Posts whose tags are all contained in `tags`.
    pub async fn get_by_tags(&self, tags: &[String]) -> AppResult<PostMap> {
        let mut posts = self.get_all().await?;
        posts.retain(|_, post| post.tags_within(tags));
        Ok(posts)
    }

    /// Shallow-merge `request` into the stored post and stamp `updatedAt`.
    pub async fn update_by_id(
        &self,
        id: &str,
        request: UpdatePostRequest,
    ) -> AppResult<Lookup<PostMap>> {
        let Some(mut post) = self.docs.fetch(id).await? else {
            return Ok(Lookup::NotFound);
        };

        if let Some(tags) = request.tags {
            post.tags = tags;
        }
        if let Some(title) = request.title {
            post.title = title;
        }
        if let Some(body) = request.body {
            post.body = body;
        }
        if let Some(is_draft) = request.is_draft {
            post.is_draft = is_draft;
        }
        post.updated_at = Some(now_millis());

        self.docs.save(id, &post).await?;
        tracing::info!("Updated post {}", id);

        Ok(Lookup::Found(PostMap::from([(id.to_string(), post)])))
    }

    pub async fn delete_by_id(&self, id: &str) -> AppResult<Lookup<String>> {
        if !self.docs.contains(id).await? {
            return Ok(Lookup::NotFound);
        }

        self.docs.remove(id).await?;
        tracing::info!("Deleted post {}", id);

        Ok(Lookup::Found(id.to_string()))
    }

    /// Delete every post; ids come back in listing order.
    pub async fn delete_all(&self) -> AppResult<Vec<String>> {
        let ids = self.docs.remove_all().await?;
        tracing::info!("Deleted {} posts", ids.len());
        Ok(ids)
    }
}
