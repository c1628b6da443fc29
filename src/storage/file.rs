use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::storage::SessionStorage;

/// Session storage persisted as a flat JSON object on disk.
///
/// The whole map is cached in memory and rewritten on every mutation, so a
/// group removal is a single file write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens the file at `path`, starting empty if it does not exist yet.
    ///
    /// A file that exists but is not a JSON string map is treated as empty and
    /// will be overwritten on the next write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened session file {} ({} keys)", path.display(), values.len());

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, values: &HashMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next).await?;
        *values = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.remove_many(&[key]).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        for key in keys {
            next.remove(*key);
        }
        if next.len() != values.len() {
            // Memory only follows once the file write went through.
            self.flush(&next).await?;
            *values = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests_file_storage {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("access_token", "t1").await.unwrap();
        storage.set("refresh_token", "r1").await.unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("access_token").await.unwrap(), Some("t1".to_string()));
        assert_eq!(reopened.get("refresh_token").await.unwrap(), Some("r1".to_string()));
    }

    #[tokio::test]
    async fn test_remove_many_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("access_token", "t1").await.unwrap();
        storage.set("user", "{}").await.unwrap();
        storage.set("theme", "dark").await.unwrap();
        storage.remove_many(&["access_token", "user"]).await.unwrap();

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("access_token").await.unwrap(), None);
        assert_eq!(reopened.get("user").await.unwrap(), None);
        assert_eq!(reopened.get("theme").await.unwrap(), Some("dark".to_string()));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cached_values_untouched() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("state");
        let path = parent.join("session.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("access_token", "t1").await.unwrap();
        storage.set("refresh_token", "r1").await.unwrap();

        // A plain file where the parent directory should be makes every flush fail.
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, "blocked").unwrap();

        assert!(matches!(
            storage.remove_many(&["access_token", "refresh_token"]).await,
            Err(AppError::Storage(_))
        ));
        assert!(storage.set("access_token", "t2").await.is_err());
        assert!(storage.remove("refresh_token").await.is_err());

        assert_eq!(storage.get("access_token").await.unwrap(), Some("t1".to_string()));
        assert_eq!(storage.get("refresh_token").await.unwrap(), Some("r1".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get("access_token").await.unwrap(), None);
    }
}
