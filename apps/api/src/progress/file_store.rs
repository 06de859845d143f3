//! JSON-file progress store for single-node deployments.
//!
//! All records live in one JSON object keyed by user id. Every mutation
//! rewrites the whole file through a temp file in the same directory followed
//! by an atomic rename, so a crash never leaves a half-written file behind.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::progress::{ProgressUpdate, UserProgress};
use crate::progress::store::{check_revision, ProgressStore};

pub struct JsonFileProgressStore {
    path: PathBuf,
    records: Mutex<HashMap<String, UserProgress>>,
}

impl JsonFileProgressStore {
    /// Opens the store at `path`, loading existing records if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let records: HashMap<String, UserProgress> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Progress file store opened at {} ({} users)",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    async fn persist(&self, records: &HashMap<String, UserProgress>) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("File writer task failed: {e}")))?
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Storage(e.error))?;
    Ok(())
}

#[async_trait]
impl ProgressStore for JsonFileProgressStore {
    async fn get_or_create(&self, user_id: &str) -> Result<UserProgress, AppError> {
        let mut records = self.records.lock().await;
        if let Some(existing) = records.get(user_id) {
            return Ok(existing.clone());
        }
        let progress = UserProgress::new(user_id);
        records.insert(user_id.to_string(), progress.clone());
        if let Err(e) = self.persist(&records).await {
            records.remove(user_id);
            return Err(e);
        }
        info!("Created progress record for user {user_id}");
        Ok(progress)
    }

    async fn initialize(&self, user_id: &str) -> Result<UserProgress, AppError> {
        let mut records = self.records.lock().await;
        if records.contains_key(user_id) {
            return Err(AppError::AlreadyExists(format!(
                "Progress for user {user_id} already exists"
            )));
        }
        let progress = UserProgress::new(user_id);
        records.insert(user_id.to_string(), progress.clone());
        if let Err(e) = self.persist(&records).await {
            records.remove(user_id);
            return Err(e);
        }
        info!("Initialized progress record for user {user_id}");
        Ok(progress)
    }

    async fn update(
        &self,
        user_id: &str,
        update: ProgressUpdate,
    ) -> Result<UserProgress, AppError> {
        let mut records = self.records.lock().await;
        let stored = records
            .get(user_id)
            .ok_or_else(|| AppError::NotFound(format!("No progress for user {user_id}")))?;
        check_revision(stored, &update)?;

        let mut merged = stored.clone();
        merged.apply(update);
        // Roll the in-memory record back if the file write fails.
        let previous = records.insert(user_id.to_string(), merged.clone());
        if let Err(e) = self.persist(&records).await {
            if let Some(previous) = previous {
                records.insert(user_id.to_string(), previous);
            }
            return Err(e);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        {
            let store = JsonFileProgressStore::open(&path).await.unwrap();
            store.initialize("alice").await.unwrap();
            store
                .update(
                    "alice",
                    ProgressUpdate {
                        xp: Some(150),
                        level: Some(2),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let reopened = JsonFileProgressStore::open(&path).await.unwrap();
        let p = reopened.get_or_create("alice").await.unwrap();
        assert_eq!(p.xp, 150);
        assert_eq!(p.level, 2);
        assert_eq!(p.revision, 1);
    }

    #[tokio::test]
    async fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");
        let store = JsonFileProgressStore::open(&path).await.unwrap();
        store.get_or_create("bob").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_initialize_duplicate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProgressStore::open(dir.path().join("p.json"))
            .await
            .unwrap();
        store.initialize("bob").await.unwrap();
        assert!(matches!(
            store.initialize("bob").await,
            Err(AppError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileProgressStore::open(dir.path().join("p.json"))
            .await
            .unwrap();
        assert!(matches!(
            store.update("ghost", ProgressUpdate::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stale_revision_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        let store = JsonFileProgressStore::open(&path).await.unwrap();
        store.initialize("alice").await.unwrap();
        store
            .update(
                "alice",
                ProgressUpdate {
                    xp: Some(40),
                    expected_revision: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = store
            .update(
                "alice",
                ProgressUpdate {
                    xp: Some(999),
                    expected_revision: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(std::fs::read(&path).unwrap(), before);

        let reopened = JsonFileProgressStore::open(&path).await.unwrap();
        let p = reopened.get_or_create("alice").await.unwrap();
        assert_eq!(p.xp, 40);
        assert_eq!(p.revision, 1);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_record() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let store = JsonFileProgressStore::open(nested.join("p.json"))
            .await
            .unwrap();
        store.initialize("alice").await.unwrap();
        std::fs::remove_dir_all(&nested).unwrap();

        let err = store
            .update(
                "alice",
                ProgressUpdate {
                    xp: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        let records = store.records.lock().await;
        let p = records.get("alice").unwrap();
        assert_eq!(p.xp, 0);
        assert_eq!(p.revision, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            JsonFileProgressStore::open(&path).await,
            Err(AppError::Serialization(_))
        ));
    }
}
