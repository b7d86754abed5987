//! Post API endpoints, mounted at `/cms/api/posts`.

use axum::extract::{Path, Query, State};

use super::{found_or_empty, success, ApiResult, ValidJson};
use crate::models::{CreatePostRequest, UpdatePostRequest};
use crate::repo::PostMap;
use crate::AppState;

/// POST / - Create a post.
pub async fn create_post(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreatePostRequest>,
) -> ApiResult<PostMap> {
    success(state.posts.create(request).await?)
}

/// GET /:id - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PostMap> {
    found_or_empty(state.posts.get_by_id(&id).await?)
}

/// GET /:year/:month/:day - Posts created on a calendar day.
pub async fn get_posts_by_entry(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(String, String, String)>,
) -> ApiResult<PostMap> {
    success(state.posts.get_by_entry(&year, &month, &day).await?)
}

/// GET / - All posts, or with `?tags=a&tags=b` only posts whose tags are all listed.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<PostMap> {
    let tags = tag_params(params);

    // Any `tags` parameter, even an empty one, selects the filter
    if tags.is_empty() {
        success(state.posts.get_all().await?)
    } else {
        success(state.posts.get_by_tags(&tags).await?)
    }
}

/// PATCH /:id - Partially update a post.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<UpdatePostRequest>,
) -> ApiResult<PostMap> {
    found_or_empty(state.posts.update_by_id(&id, request).await?)
}

/// DELETE / - Delete every post.
pub async fn delete_all_posts(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    success(state.posts.delete_all().await?)
}

/// DELETE /:id - Delete a post.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<String> {
    found_or_empty(state.posts.delete_by_id(&id).await?)
}

fn tag_params(params: Vec<(String, String)>) -> Vec<String> {
    params
        .into_iter()
        .filter(|(key, _)| key == "tags")
        .map(|(_, value)| value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_params_collects_repeated_values() {
        let params = vec![
            ("tags".to_string(), "aws".to_string()),
            ("draft".to_string(), "true".to_string()),
            ("tags".to_string(), "nodejs".to_string()),
        ];
        assert_eq!(tag_params(params), vec!["aws", "nodejs"]);
    }

    #[test]
    fn test_empty_tag_param_still_counts() {
        let params = vec![("tags".to_string(), String::new())];
        assert_eq!(tag_params(params), vec![""]);
    }
}
