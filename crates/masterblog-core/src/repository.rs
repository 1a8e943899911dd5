//! Post repository - the single owner of the in-memory post collection.
//!
//! All mutations are serialized behind one async mutex. Each one works on a
//! copy of the collection, persists the copy through the [`PostStore`], and
//! only then swaps it in, so memory never runs ahead of the durable copy.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Post, PostId};
use crate::error::DomainError;
use crate::ports::PostStore;
use crate::query;
use crate::validation::{PostFields, SortQuery};

pub struct PostRepository {
    posts: Mutex<Vec<Post>>,
    store: Arc<dyn PostStore>,
}

impl PostRepository {
    /// Load the collection from `store` and take ownership of it.
    pub async fn open(store: Arc<dyn PostStore>) -> Self {
        let posts = store.load().await;
        tracing::info!(count = posts.len(), "Post collection loaded");
        warn_on_bad_ids(&posts);

        Self {
            posts: Mutex::new(posts),
            store,
        }
    }

    /// Number of posts currently held.
    pub async fn len(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of the collection in stored order.
    pub async fn all(&self) -> Vec<Post> {
        self.posts.lock().await.clone()
    }

    pub async fn get(&self, id: PostId) -> Result<Post, DomainError> {
        let posts = self.posts.lock().await;
        posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// The collection, optionally ordered by `query`.
    pub async fn list(&self, query: &SortQuery) -> Result<Vec<Post>, DomainError> {
        query::list(self.all().await, query)
    }

    /// Posts matching any supplied field.
    pub async fn search(&self, criteria: &PostFields) -> Vec<Post> {
        let posts = self.posts.lock().await;
        query::search(&posts, criteria)
    }

    /// Create a post from a complete, valid set of fields.
    pub async fn create(&self, fields: PostFields) -> Result<Post, DomainError> {
        let errors = fields.creation_errors();
        let (title, content, author, date) = match fields {
            PostFields {
                title: Some(title),
                content: Some(content),
                author: Some(author),
                date: Some(date),
            } if errors.is_empty() => (title, content, author, date),
            _ => return Err(DomainError::Validation(errors)),
        };

        let post = self
            .mutate(|posts| {
                let id = next_id(posts)?;
                let post = Post::new(id, title, content, author, date);
                posts.push(post.clone());
                Ok(post)
            })
            .await?;

        tracing::info!(post_id = post.id, "Post created");
        Ok(post)
    }

    /// Overwrite the supplied fields of an existing post.
    pub async fn update(&self, id: PostId, fields: PostFields) -> Result<Post, DomainError> {
        if fields.is_empty() {
            return Err(DomainError::invalid(
                "fields",
                "at least one of title, content, author, date is required",
            ));
        }
        if let Some(error) = fields.date_error() {
            return Err(DomainError::Validation(vec![error]));
        }

        let post = self
            .mutate(|posts| {
                let post = find_mut(posts, id)?;
                if let Some(title) = fields.title {
                    post.title = title;
                }
                if let Some(content) = fields.content {
                    post.content = content;
                }
                if let Some(author) = fields.author {
                    post.author = author;
                }
                if let Some(date) = fields.date {
                    post.date = date;
                }
                Ok(post.clone())
            })
            .await?;

        tracing::info!(post_id = id, "Post updated");
        Ok(post)
    }

    /// Remove a post; its id is not handed out again while a larger id exists.
    pub async fn delete(&self, id: PostId) -> Result<Post, DomainError> {
        let removed = self
            .mutate(|posts| {
                let index = posts
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| DomainError::post_not_found(id))?;
                Ok(posts.remove(index))
            })
            .await?;

        tracing::info!(post_id = id, "Post deleted");
        Ok(removed)
    }

    /// Add exactly one like.
    pub async fn like(&self, id: PostId) -> Result<Post, DomainError> {
        let post = self
            .mutate(|posts| {
                let post = find_mut(posts, id)?;
                post.likes = post.likes.checked_add(1).ok_or_else(|| {
                    DomainError::invalid("likes", "like counter is at its maximum")
                })?;
                Ok(post.clone())
            })
            .await?;

        tracing::debug!(post_id = id, likes = post.likes, "Post liked");
        Ok(post)
    }

    /// Append a comment; blank text is rejected.
    pub async fn comment(&self, id: PostId, text: Option<&str>) -> Result<Post, DomainError> {
        let post = self
            .mutate(|posts| {
                let post = find_mut(posts, id)?;
                let text = text
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| DomainError::invalid("comment", "Comment cannot be empty"))?;
                post.comments.push(text.to_owned());
                Ok(post.clone())
            })
            .await?;

        tracing::debug!(
            post_id = id,
            comments = post.comments.len(),
            "Comment added"
        );
        Ok(post)
    }

    /// Run `change` against a copy of the collection and commit it once saved.
    async fn mutate<T, F>(&self, change: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Vec<Post>) -> Result<T, DomainError>,
    {
        let mut posts = self.posts.lock().await;
        let mut next = posts.clone();
        let output = change(&mut next)?;

        if let Err(e) = self.store.save(&next).await {
            tracing::error!(error = %e, "Post collection not persisted, change discarded");
            return Err(e.into());
        }

        *posts = next;
        Ok(output)
    }
}

/// One past the highest id in use, or 1 for an empty collection.
fn next_id(posts: &[Post]) -> Result<PostId, DomainError> {
    posts
        .iter()
        .map(|p| p.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| DomainError::invalid("id", "no post ids left above the highest stored id"))
}

/// Stored ids should be positive and distinct. Violations are logged, not
/// repaired; lookups by a repeated id see the first match.
fn warn_on_bad_ids(posts: &[Post]) {
    let mut seen = HashSet::with_capacity(posts.len());
    for post in posts {
        if post.id == 0 {
            tracing::warn!("Loaded post with id 0, it cannot be addressed by id");
        } else if !seen.insert(post.id) {
            tracing::warn!(post_id = post.id, "Loaded duplicate post id");
        }
    }
}

fn find_mut(posts: &mut [Post], id: PostId) -> Result<&mut Post, DomainError> {
    posts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| DomainError::post_not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::error::StoreError;

    /// Records saves; can be switched to fail.
    #[derive(Default)]
    struct RecordingStore {
        initial: Vec<Post>,
        saves: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl PostStore for RecordingStore {
        async fn load(&self) -> Vec<Post> {
            self.initial.clone()
        }

        async fn save(&self, _posts: &[Post]) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Io("read-only filesystem".to_string()));
            }
            Ok(())
        }
    }

    fn fields(title: &str) -> PostFields {
        PostFields {
            title: Some(title.to_string()),
            content: Some("body".to_string()),
            author: Some("ann".to_string()),
            date: Some("2024-01-01".to_string()),
        }
    }

    #[test]
    fn next_id_skips_gaps() {
        let posts = vec![
            Post::new(1, "a".into(), "b".into(), "c".into(), "2024-01-01".into()),
            Post::new(5, "a".into(), "b".into(), "c".into(), "2024-01-01".into()),
        ];
        assert_eq!(next_id(&posts).unwrap(), 6);
        assert_eq!(next_id(&[]).unwrap(), 1);
    }

    #[tokio::test]
    async fn create_past_the_largest_id_is_rejected() {
        let top = Post::new(u64::MAX, "a".into(), "b".into(), "c".into(), "2024-01-01".into());
        let store = Arc::new(RecordingStore {
            initial: vec![top],
            ..Default::default()
        });
        let repo = PostRepository::open(store.clone()).await;

        let err = repo.create(fields("one too many")).await.unwrap_err();

        assert_eq!(err.field_errors()[0].field, "id");
        assert_eq!(repo.len().await, 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn like_at_counter_limit_is_rejected() {
        let mut post = Post::new(1, "a".into(), "b".into(), "c".into(), "2024-01-01".into());
        post.likes = u64::MAX;
        let store = Arc::new(RecordingStore {
            initial: vec![post],
            ..Default::default()
        });
        let repo = PostRepository::open(store.clone()).await;

        let err = repo.like(1).await.unwrap_err();

        assert_eq!(err.field_errors()[0].field, "likes");
        assert_eq!(repo.get(1).await.unwrap().likes, u64::MAX);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_mutation_is_saved() {
        let store = Arc::new(RecordingStore::default());
        let repo = PostRepository::open(store.clone()).await;

        let post = repo.create(fields("first")).await.unwrap();
        repo.like(post.id).await.unwrap();
        repo.comment(post.id, Some("hi")).await.unwrap();
        repo.update(post.id, fields("renamed")).await.unwrap();
        repo.delete(post.id).await.unwrap();

        assert_eq!(store.saves.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn rejected_input_is_never_saved() {
        let store = Arc::new(RecordingStore::default());
        let repo = PostRepository::open(store.clone()).await;

        assert!(repo.create(PostFields::default()).await.is_err());
        assert!(repo.like(1).await.is_err());

        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_save_surfaces_and_leaves_memory_untouched() {
        let store = Arc::new(RecordingStore::default());
        let repo = PostRepository::open(store.clone()).await;
        let post = repo.create(fields("kept")).await.unwrap();

        store.fail.store(true, Ordering::SeqCst);

        let err = repo.like(post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
        let err = repo.create(fields("lost")).await.unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get(post.id).await.unwrap().likes, 0);
    }

    #[tokio::test]
    async fn update_checks_input_before_lookup() {
        let repo = PostRepository::open(Arc::new(RecordingStore::default())).await;

        let err = repo.update(99, PostFields::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = repo
            .update(
                99,
                PostFields {
                    title: Some("x".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn update_rejects_malformed_date() {
        let repo = PostRepository::open(Arc::new(RecordingStore::default())).await;
        let post = repo.create(fields("dated")).await.unwrap();

        let err = repo
            .update(
                post.id,
                PostFields {
                    date: Some("2024-13-01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.field_errors()[0].field, "date");
        assert_eq!(repo.get(post.id).await.unwrap().date, "2024-01-01");
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found_even_if_blank() {
        let repo = PostRepository::open(Arc::new(RecordingStore::default())).await;

        let err = repo.comment(3, Some("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 3, .. }));
    }
}
