//! Blog CMS Backend
//!
//! Serves the posts and tags collections from a key-value store and forwards
//! `/blog` traffic to the blog renderer.

mod api;
mod config;
mod errors;
mod gateway;
mod models;
mod repo;
mod store;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use gateway::BlogProxy;
use repo::{PostRepository, TagRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostRepository>,
    pub tags: Arc<TagRepository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CMS Backend");
    tracing::info!("Store: {:?}", config.store);
    tracing::info!("Bind address: {}", config.bind_addr);

    match &config.blog_upstream {
        Some(upstream) => tracing::info!("Proxying /blog to {}", upstream),
        None => tracing::warn!("No blog upstream configured (CMS_BLOG_UPSTREAM); /blog is disabled"),
    }

    // Open one store per collection
    let stores = store::open_stores(&config.store).await?;

    let state = AppState {
        posts: Arc::new(PostRepository::new(stores.posts)),
        tags: Arc::new(TagRepository::new(stores.tags)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> errors::AppResult<Router> {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let post_routes = Router::new()
        .route("/", get(api::list_posts))
        .route("/", post(api::create_post))
        .route("/", delete(api::delete_all_posts))
        .route("/{id}", get(api::get_post))
        .route("/{id}", patch(api::update_post))
        .route("/{id}", delete(api::delete_post))
        .route("/{year}/{month}/{day}", get(api::get_posts_by_entry));

    let tag_routes = Router::new()
        .route("/", get(api::list_tags))
        .route("/", delete(api::delete_all_tags))
        .route("/{name}", post(api::create_tag))
        .route("/{name}", get(api::get_tag))
        .route("/{name}", patch(api::update_tag))
        .route("/{name}", delete(api::delete_tag));

    let mut app = Router::new()
        .nest("/cms/api/posts", post_routes)
        .nest("/cms/api/tags", tag_routes)
        .route("/", get(root))
        .route("/health", get(health_check));

    if let Some(upstream) = &state.config.blog_upstream {
        app = app.merge(gateway::router(BlogProxy::new(upstream)?));
    }

    Ok(app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Gateway landing page.
async fn root() -> &'static str {
    "CMS gateway"
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
