//! Application state - shared across all handlers.

use std::sync::Arc;

use masterblog_core::PostRepository;
use masterblog_core::ports::PostStore;
use masterblog_infra::JsonFileStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostRepository>,
}

impl AppState {
    /// Build the state on top of the configured JSON data file.
    pub async fn new(config: &AppConfig) -> Self {
        tracing::info!(path = %config.posts_file.display(), "Using JSON post store");
        let store: Arc<dyn PostStore> = Arc::new(JsonFileStore::new(&config.posts_file));
        Self::with_store(store).await
    }

    pub async fn with_store(store: Arc<dyn PostStore>) -> Self {
        let posts = Arc::new(PostRepository::open(store).await);
        tracing::info!("Application state initialized");
        Self { posts }
    }
}
