//! Path-prefix gateway to the blog renderer.
//!
//! Requests under `/blog` are forwarded unchanged (method, path, query,
//! headers, body) to the configured upstream and its response is relayed
//! back. The CMS API itself is served in-process and never proxied.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

use crate::errors::{AppError, AppResult};

/// Largest request body relayed to the upstream.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-level headers that must not be relayed between hops.
static HOP_BY_HOP: [HeaderName; 5] = [
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TE,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Reverse proxy to one upstream service.
pub struct BlogProxy {
    client: reqwest::Client,
    upstream: String,
}

impl BlogProxy {
    /// The upstream is reached directly, ignoring any system HTTP proxy.
    pub fn new(upstream: &str) -> AppResult<Self> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            upstream: upstream.trim_end_matches('/').to_string(),
        })
    }

    /// Relay `request` to the upstream and return its response.
    pub async fn forward(&self, request: Request) -> AppResult<Response> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let target = format!("{}{}", self.upstream, path_and_query);

        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| AppError::Validation(format!("Unreadable request body: {}", e)))?;

        let mut headers = parts.headers;
        headers.remove(header::HOST);
        for name in &HOP_BY_HOP {
            headers.remove(name);
        }

        tracing::debug!("Proxying {} {} to {}", parts.method, path_and_query, target);

        let upstream = self
            .client
            .request(parts.method, &target)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        for name in &HOP_BY_HOP {
            headers.remove(name);
        }
        let body = upstream.bytes().await?;

        Ok((status, headers, body).into_response())
    }
}

/// Routes `/blog` and everything below it to `proxy`.
pub fn router<S>(proxy: BlogProxy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/blog", any(forward))
        .route("/blog/{*path}", any(forward))
        .with_state(Arc::new(proxy))
}

async fn forward(State(proxy): State<Arc<BlogProxy>>, request: Request) -> AppResult<Response> {
    proxy.forward(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        http::{self, HeaderMap, Method, StatusCode, Uri},
    };
    use tower::ServiceExt;

    /// Upstream that echoes what it received.
    async fn spawn_echo_upstream() -> String {
        async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
            let seen = format!(
                "{} {} x-blog={} body={}",
                method,
                uri,
                headers
                    .get("x-blog")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-"),
                String::from_utf8_lossy(&body)
            );
            (StatusCode::ACCEPTED, [("x-upstream", "blog")], seen).into_response()
        }

        let app = Router::new().fallback(echo);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_forwards_request_verbatim() {
        let upstream = spawn_echo_upstream().await;
        let app: Router = router(BlogProxy::new(&upstream).unwrap());

        let response = app
            .oneshot(
                http::Request::builder()
                    .method("POST")
                    .uri("/blog/posts/1?draft=true")
                    .header("x-blog", "yes")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-upstream"], "blog");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "POST /blog/posts/1?draft=true x-blog=yes body=hello"
        );
    }

    #[tokio::test]
    async fn test_forwards_bare_prefix() {
        let upstream = spawn_echo_upstream().await;
        let app: Router = router(BlogProxy::new(&upstream).unwrap());

        let response = app
            .oneshot(http::Request::builder().uri("/blog").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).starts_with("GET /blog "));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let app: Router = router(BlogProxy::new(&format!("http://{}", addr)).unwrap());
        let response = app
            .oneshot(http::Request::builder().uri("/blog").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
