//! Progress Store — pluggable persistence for `UserProgress`, keyed by user id.
//!
//! `AppState` holds an `Arc<dyn ProgressStore>`, chosen at startup from config:
//! `InMemoryProgressStore`, `JsonFileProgressStore` or `PgProgressStore`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::progress::{ProgressUpdate, UserProgress};

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Returns the user's progress, creating the zero state if none exists.
    /// The existence check and insert happen as one atomic step.
    async fn get_or_create(&self, user_id: &str) -> Result<UserProgress, AppError>;

    /// Creates the zero state. Fails with `AlreadyExists` if a record is present.
    async fn initialize(&self, user_id: &str) -> Result<UserProgress, AppError>;

    /// Merges `update` into the stored record and returns the merged result.
    ///
    /// Fails with `NotFound` if the user has no record, and with `Conflict`
    /// if `update.expected_revision` is set and no longer matches.
    async fn update(&self, user_id: &str, update: ProgressUpdate)
        -> Result<UserProgress, AppError>;
}

/// Shared revision check for backends that hold records in memory.
pub(crate) fn check_revision(
    stored: &UserProgress,
    update: &ProgressUpdate,
) -> Result<(), AppError> {
    match update.expected_revision {
        Some(expected) if expected != stored.revision => Err(AppError::Conflict(format!(
            "Progress for user {} changed (revision {} != expected {})",
            stored.user_id, stored.revision, expected
        ))),
        _ => Ok(()),
    }
}
