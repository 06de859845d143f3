//! In-memory progress store. State is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::models::progress::{ProgressUpdate, UserProgress};
use crate::progress::store::{check_revision, ProgressStore};

#[derive(Default)]
pub struct InMemoryProgressStore {
    records: RwLock<HashMap<String, UserProgress>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get_or_create(&self, user_id: &str) -> Result<UserProgress, AppError> {
        if let Some(existing) = self.records.read().await.get(user_id) {
            return Ok(existing.clone());
        }

        // Re-check under the write lock; another caller may have inserted meanwhile.
        let mut records = self.records.write().await;
        let progress = records.entry(user_id.to_string()).or_insert_with(|| {
            info!("Created progress record for user {user_id}");
            UserProgress::new(user_id)
        });
        Ok(progress.clone())
    }

    async fn initialize(&self, user_id: &str) -> Result<UserProgress, AppError> {
        let mut records = self.records.write().await;
        if records.contains_key(user_id) {
            return Err(AppError::AlreadyExists(format!(
                "Progress for user {user_id} already exists"
            )));
        }
        let progress = UserProgress::new(user_id);
        records.insert(user_id.to_string(), progress.clone());
        info!("Initialized progress record for user {user_id}");
        Ok(progress)
    }

    async fn update(
        &self,
        user_id: &str,
        update: ProgressUpdate,
    ) -> Result<UserProgress, AppError> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("No progress for user {user_id}")))?;
        check_revision(stored, &update)?;
        stored.apply(update);
        Ok(stored.clone())
    }
}
