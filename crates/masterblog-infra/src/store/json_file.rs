//! JSON file post store - the whole collection lives in one file.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use masterblog_core::domain::Post;
use masterblog_core::error::StoreError;
use masterblog_core::ports::PostStore;

/// File-backed store holding the collection as a pretty-printed JSON array.
///
/// Saves go to a sibling `.tmp` file which is synced and then renamed over
/// the target, so a crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write_atomic(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(parent, "create data directory", e))?;
        }

        let temp = self.temp_path();
        let written = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(io_failure(&temp, "write temporary file", e));
        }

        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(io_failure(&self.path, "replace data file", e));
        }

        Ok(())
    }
}

#[async_trait]
impl PostStore for JsonFileStore {
    async fn load(&self) -> Vec<Post> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Data file does not exist, starting with no posts"
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read data file, starting with no posts"
                );
                return Vec::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }

        match serde_json::from_slice::<Vec<Post>>(&bytes) {
            Ok(posts) => {
                tracing::debug!(path = %self.path.display(), count = posts.len(), "Posts loaded");
                posts
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to decode data file, starting with no posts"
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        let bytes = encode(posts).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to serialize posts");
            StoreError::Serialization(e.to_string())
        })?;

        self.write_atomic(&bytes).await?;
        tracing::debug!(path = %self.path.display(), count = posts.len(), "Posts saved");
        Ok(())
    }
}

fn encode(posts: &[Post]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    posts.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn io_failure(path: &Path, action: &str, e: std::io::Error) -> StoreError {
    tracing::error!(path = %path.display(), error = %e, "Failed to {action}");
    StoreError::Io(format!("{action} at {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64) -> Post {
        let mut post = Post::new(
            id,
            format!("Title {id}"),
            "Body".to_string(),
            "ann".to_string(),
            "2024-05-06".to_string(),
        );
        post.likes = id * 2;
        post.comments = vec!["first".to_string(), "second".to_string()];
        post
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("posts.json"));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "[{\"id\": 1, ").unwrap();

        assert!(JsonFileStore::new(&path).load().await.is_empty());
    }

    #[tokio::test]
    async fn saved_posts_load_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("posts.json"));
        let posts = vec![post(3), post(1)];

        store.save(&posts).await.unwrap();
        let loaded = store.load().await;
        store.save(&loaded).await.unwrap();

        assert_eq!(loaded, posts);
        assert_eq!(store.load().await, posts);
    }

    #[tokio::test]
    async fn save_creates_parent_directory_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("posts.json");
        let store = JsonFileStore::new(&path);

        store.save(&[post(1)]).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn file_is_indented_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        JsonFileStore::new(&path).save(&[post(1)]).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": 1,"));
    }

    #[tokio::test]
    async fn legacy_records_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[{"id": 4, "title": "t", "content": "c", "author": "a", "date": "2024-01-01"}]"#,
        )
        .unwrap();

        let posts = JsonFileStore::new(&path).load().await;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].likes, 0);
        assert!(posts[0].comments.is_empty());
    }

    #[tokio::test]
    async fn null_fields_do_not_drop_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "title": "t", "content": "c", "author": "a", "date": "2024-01-01"},
                {"id": 2, "title": null, "content": "c", "author": "a", "date": null, "likes": null}
            ]"#,
        )
        .unwrap();

        let posts = JsonFileStore::new(&path).load().await;

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].title, "");
        assert_eq!(posts[1].date, "");
        assert_eq!(posts[1].likes, 0);
    }

    #[tokio::test]
    async fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = JsonFileStore::new(blocker.join("posts.json"));

        let err = store.save(&[post(1)]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
