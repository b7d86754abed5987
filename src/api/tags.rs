//! Tag API endpoints, mounted at `/cms/api/tags`.

use axum::extract::{Path, State};

use super::{found_or_empty, success, ApiResult, ValidJson};
use crate::models::{CreateTagRequest, DeletedTag, DeletedTags, UpdateTagRequest};
use crate::repo::TagMap;
use crate::AppState;

/// POST /:name - Create a tag.
pub async fn create_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ValidJson(request): ValidJson<CreateTagRequest>,
) -> ApiResult<TagMap> {
    let tag = state.tags.create(&name, request).await?;
    success(TagMap::from([(name, tag)]))
}

/// GET /:name - Get a single tag.
pub async fn get_tag(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<TagMap> {
    let tag = state.tags.get_by_name(&name).await?;
    found_or_empty(tag.map(|tag| TagMap::from([(name, tag)])))
}

/// GET / - List all tags.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<TagMap> {
    success(state.tags.get_all().await?)
}

/// PATCH /:name - Update a tag.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ValidJson(request): ValidJson<UpdateTagRequest>,
) -> ApiResult<TagMap> {
    let tag = state.tags.update_by_name(&name, request).await?;
    found_or_empty(tag.map(|tag| TagMap::from([(name, tag)])))
}

/// DELETE / - Delete every tag.
pub async fn delete_all_tags(State(state): State<AppState>) -> ApiResult<DeletedTags> {
    let deleted_tags = state.tags.delete_all().await?;
    success(DeletedTags { deleted_tags })
}

/// DELETE /:name - Delete a tag.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<DeletedTag> {
    let deleted = state.tags.delete_by_name(&name).await?;
    found_or_empty(deleted.map(|deleted_tag| DeletedTag { deleted_tag }))
}
