//! Tags repository. Tags are keyed directly by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{now_millis, Documents, Lookup};
use crate::errors::AppResult;
use crate::models::{CreateTagRequest, Tag, UpdateTagRequest};
use crate::store::KvStore;

/// Tags keyed by name.
pub type TagMap = BTreeMap<String, Tag>;

pub struct TagRepository {
    docs: Documents<Tag>,
}

impl TagRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            docs: Documents::new(store),
        }
    }

    /// Create (or overwrite) the tag `name`.
    pub async fn create(&self, name: &str, request: CreateTagRequest) -> AppResult<Tag> {
        let tag = Tag {
            related_tags: request.related_tags,
            created_at: now_millis(),
            updated_at: None,
        };

        self.docs.save(name, &tag).await?;
        tracing::info!("Created tag {}", name);

        Ok(tag)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Lookup<Tag>> {
        Ok(self.docs.fetch(name).await?.into())
    }

    pub async fn get_all(&self) -> AppResult<TagMap> {
        self.docs.fetch_all().await
    }

    pub async fn update_by_name(
        &self,
        name: &str,
        request: UpdateTagRequest,
    ) -> AppResult<Lookup<Tag>> {
        let Some(mut tag) = self.docs.fetch(name).await? else {
            return Ok(Lookup::NotFound);
        };

        if let Some(related_tags) = request.related_tags {
            tag.related_tags = related_tags;
        }
        tag.updated_at = Some(now_millis());

        self.docs.save(name, &tag).await?;
        tracing::info!("Updated tag {}", name);

        Ok(Lookup::Found(tag))
    }

    pub async fn delete_by_name(&self, name: &str) -> AppResult<Lookup<String>> {
        if !self.docs.contains(name).await? {
            return Ok(Lookup::NotFound);
        }

        self.docs.remove(name).await?;
        tracing::info!("Deleted tag {}", name);

        Ok(Lookup::Found(name.to_string()))
    }

    pub async fn delete_all(&self) -> AppResult<Vec<String>> {
        let names = self.docs.remove_all().await?;
        tracing::info!("Deleted {} tags", names.len());
        Ok(names)
    }
}
