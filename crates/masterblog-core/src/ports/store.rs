use async_trait::async_trait;

use crate::domain::Post;
use crate::error::StoreError;

/// Durable copy of the whole post collection.
///
/// Implementations move the collection as one unit and never look inside a post.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Read the full collection.
    ///
    /// A missing or unreadable backing store yields an empty collection; the
    /// cause is logged, not returned.
    async fn load(&self) -> Vec<Post>;

    /// Replace the stored collection with `posts`.
    async fn save(&self, posts: &[Post]) -> Result<(), StoreError>;
}
