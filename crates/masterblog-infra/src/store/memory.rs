//! In-memory post store - nothing survives a restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use masterblog_core::domain::Post;
use masterblog_core::error::StoreError;
use masterblog_core::ports::PostStore;

/// Post store kept in process memory.
///
/// Used for ephemeral runs and tests. `failing()` builds a store whose saves
/// always error, to exercise the persistence failure path.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
    reject_saves: bool,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            reject_saves: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            reject_saves: true,
        }
    }

    /// Copy of the last saved collection.
    pub async fn snapshot(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn load(&self) -> Vec<Post> {
        self.snapshot().await
    }

    async fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        if self.reject_saves {
            return Err(StoreError::Io("in-memory store rejects writes".to_string()));
        }

        let mut stored = self.posts.write().await;
        *stored = posts.to_vec();
        Ok(())
    }
}
