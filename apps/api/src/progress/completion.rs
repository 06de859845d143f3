//! Task completion — the only path that mutates a user's progress.
//!
//! Pipeline: load progress → reject duplicates → compute xp/level/streak →
//! evaluate badges → write back with a revision check. A revision conflict
//! (another tab completed something in between) re-runs the pipeline against
//! fresh state, so concurrent completions never overwrite each other.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::progress::{EarnedBadge, ProgressUpdate, UserProgress};
use crate::progress::badges::evaluate;
use crate::progress::clock::Clock;
use crate::progress::leveling::{level_for_xp, next_streak};
use crate::progress::store::ProgressStore;

const MAX_COMPLETION_ATTEMPTS: usize = 3;
/// Ceiling on the XP a single task may award.
pub const MAX_TASK_XP: u32 = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub new_badges: Vec<EarnedBadge>,
    pub updated_progress: UserProgress,
}

/// Records `task_id` as completed for `user_id` and awards `task_xp`.
///
/// Fails with `AlreadyCompleted` (and changes nothing) if the task is already
/// in the user's completed set. Exactly one store write on success.
pub async fn complete_task(
    store: &dyn ProgressStore,
    clock: &dyn Clock,
    user_id: &str,
    task_id: &str,
    task_xp: u32,
) -> Result<CompletionOutcome, AppError> {
    validate_request(user_id, task_id, task_xp)?;

    let mut attempt = 1;
    loop {
        let current = store.get_or_create(user_id).await?;
        let (update, new_badges) = plan_completion(&current, task_id, task_xp, clock)?;

        match store.update(user_id, update).await {
            Ok(updated_progress) => {
                info!(
                    "User {user_id} completed task {task_id}: xp={} level={} streak={} new_badges={}",
                    updated_progress.xp,
                    updated_progress.level,
                    updated_progress.streak_days,
                    new_badges.len()
                );
                return Ok(CompletionOutcome {
                    new_badges,
                    updated_progress,
                });
            }
            Err(AppError::Conflict(msg)) if attempt < MAX_COMPLETION_ATTEMPTS => {
                warn!("Completion of {task_id} for {user_id} hit a concurrent write (attempt {attempt}): {msg}");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn validate_request(user_id: &str, task_id: &str, task_xp: u32) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    if task_id.trim().is_empty() {
        return Err(AppError::Validation("task_id cannot be empty".to_string()));
    }
    if task_xp == 0 {
        return Err(AppError::Validation("task_xp must be positive".to_string()));
    }
    if task_xp > MAX_TASK_XP {
        return Err(AppError::Validation(format!(
            "task_xp must be at most {MAX_TASK_XP}"
        )));
    }
    Ok(())
}

/// Computes the full post-completion write for `current` without touching the store.
fn plan_completion(
    current: &UserProgress,
    task_id: &str,
    task_xp: u32,
    clock: &dyn Clock,
) -> Result<(ProgressUpdate, Vec<EarnedBadge>), AppError> {
    if current.completed_tasks.contains(task_id) {
        return Err(AppError::AlreadyCompleted {
            task_id: task_id.to_string(),
        });
    }

    let new_xp = current.xp.checked_add(task_xp).ok_or_else(|| {
        AppError::Validation(format!(
            "Awarding {task_xp} XP would overflow the XP total for user {}",
            current.user_id
        ))
    })?;
    let new_level = level_for_xp(new_xp);
    let mut new_completed = current.completed_tasks.clone();
    new_completed.insert(task_id.to_string());

    let today = clock.today();
    let streak_days = next_streak(current.streak_days, current.last_active_date, today);

    let new_badges = evaluate(current, new_xp, &new_completed, clock.now());
    let mut all_badges = current.badges.clone();
    all_badges.extend(new_badges.iter().cloned());

    let update = ProgressUpdate {
        xp: Some(new_xp),
        level: Some(new_level),
        completed_tasks: Some(new_completed),
        badges: Some(all_badges),
        streak_days: Some(streak_days),
        last_active_date: Some(today),
        expected_revision: Some(current.revision),
    };
    Ok((update, new_badges))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::progress::clock::FixedClock;
    use crate::progress::memory_store::InMemoryProgressStore;

    fn badge_ids(badges: &[EarnedBadge]) -> Vec<&str> {
        badges.iter().map(|b| b.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_level_up() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        let first = complete_task(&store, &clock, "u1", "task-a", 50).await.unwrap();
        assert_eq!(first.updated_progress.xp, 50);
        assert_eq!(first.updated_progress.level, 1);
        assert_eq!(badge_ids(&first.new_badges), vec!["first-task"]);

        let second = complete_task(&store, &clock, "u1", "task-b", 60).await.unwrap();
        assert_eq!(second.updated_progress.xp, 110);
        assert_eq!(second.updated_progress.level, 2);
        assert!(badge_ids(&second.new_badges).contains(&"level-up"));
        assert!(second.updated_progress.has_badge("first-task"));
        assert!(second.updated_progress.has_badge("level-up"));
    }

    #[tokio::test]
    async fn test_duplicate_completion_rejected_without_change() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        complete_task(&store, &clock, "u1", "task-a", 30).await.unwrap();
        let err = complete_task(&store, &clock, "u1", "task-a", 30)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyCompleted { ref task_id } if task_id == "task-a"));

        let p = store.get_or_create("u1").await.unwrap();
        assert_eq!(p.xp, 30);
        assert_eq!(p.completed_tasks.len(), 1);
        assert_eq!(p.revision, 1);
    }

    #[tokio::test]
    async fn test_level_invariant_holds_after_each_completion() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);
        for (i, xp) in [15, 85, 1, 99, 100, 250].into_iter().enumerate() {
            let out = complete_task(&store, &clock, "u1", &format!("t{i}"), xp)
                .await
                .unwrap();
            let p = out.updated_progress;
            assert_eq!(p.level, p.xp / 100 + 1);
        }
    }

    #[tokio::test]
    async fn test_xp_collector_earned_once_and_kept() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        let out = complete_task(&store, &clock, "u1", "a", 150).await.unwrap();
        assert!(!out.updated_progress.has_badge("xp-collector"));

        let out = complete_task(&store, &clock, "u1", "b", 60).await.unwrap();
        assert!(badge_ids(&out.new_badges).contains(&"xp-collector"));

        let out = complete_task(&store, &clock, "u1", "c", 10).await.unwrap();
        assert!(!badge_ids(&out.new_badges).contains(&"xp-collector"));
        assert!(out.updated_progress.has_badge("xp-collector"));
        let count = out
            .updated_progress
            .badges
            .iter()
            .filter(|b| b.id == "xp-collector")
            .count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_streak_extends_on_consecutive_days() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        complete_task(&store, &clock, "u1", "a", 10).await.unwrap();
        clock.advance_days(1);
        let out = complete_task(&store, &clock, "u1", "b", 10).await.unwrap();
        assert_eq!(out.updated_progress.streak_days, 2);
        assert_eq!(
            out.updated_progress.last_active_date,
            Some(clock.today())
        );
    }

    #[tokio::test]
    async fn test_streak_resets_after_gap() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        complete_task(&store, &clock, "u1", "a", 10).await.unwrap();
        clock.advance_days(1);
        complete_task(&store, &clock, "u1", "b", 10).await.unwrap();
        clock.advance_days(3);
        let out = complete_task(&store, &clock, "u1", "c", 10).await.unwrap();
        assert_eq!(out.updated_progress.streak_days, 1);
    }

    #[tokio::test]
    async fn test_same_day_completion_keeps_streak() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        complete_task(&store, &clock, "u1", "a", 10).await.unwrap();
        let out = complete_task(&store, &clock, "u1", "b", 10).await.unwrap();
        assert_eq!(out.updated_progress.streak_days, 1);
    }

    #[tokio::test]
    async fn test_streak_badge_lags_one_completion() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);

        for (day, task) in ["a", "b", "c"].into_iter().enumerate() {
            if day > 0 {
                clock.advance_days(1);
            }
            let out = complete_task(&store, &clock, "u1", task, 5).await.unwrap();
            assert!(!out.updated_progress.has_badge("streak-3"));
        }
        let out = complete_task(&store, &clock, "u1", "d", 5).await.unwrap();
        assert_eq!(badge_ids(&out.new_badges), vec!["streak-3"]);
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);
        for (user, task, xp) in [("", "a", 10), ("u1", " ", 10), ("u1", "a", 0)] {
            let err = complete_task(&store, &clock, user, task, xp)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_task_xp_above_ceiling_rejected() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);
        let err = complete_task(&store, &clock, "u1", "a", MAX_TASK_XP + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(complete_task(&store, &clock, "u1", "a", MAX_TASK_XP).await.is_ok());
    }

    #[tokio::test]
    async fn test_xp_overflow_rejected_without_recording_task() {
        let store = InMemoryProgressStore::new();
        let clock = FixedClock::at(2024, 5, 1);
        store.initialize("u1").await.unwrap();
        store
            .update(
                "u1",
                ProgressUpdate {
                    xp: Some(u32::MAX - 5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = complete_task(&store, &clock, "u1", "a", 10).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let p = store.get_or_create("u1").await.unwrap();
        assert_eq!(p.xp, u32::MAX - 5);
        assert!(p.completed_tasks.is_empty());
    }

    /// Delegates to an in-memory store but sneaks in a competing completion
    /// before the first `update` lands.
    struct RacingStore {
        inner: InMemoryProgressStore,
        raced: AtomicUsize,
    }

    #[async_trait]
    impl ProgressStore for RacingStore {
        async fn get_or_create(&self, user_id: &str) -> Result<UserProgress, AppError> {
            self.inner.get_or_create(user_id).await
        }

        async fn initialize(&self, user_id: &str) -> Result<UserProgress, AppError> {
            self.inner.initialize(user_id).await
        }

        async fn update(
            &self,
            user_id: &str,
            update: ProgressUpdate,
        ) -> Result<UserProgress, AppError> {
            if self.raced.fetch_add(1, Ordering::SeqCst) == 0 {
                let other = self.inner.get_or_create(user_id).await?;
                let (competing, _) =
                    plan_completion(&other, "other-tab", 40, &FixedClock::at(2024, 5, 1))?;
                self.inner.update(user_id, competing).await?;
            }
            self.inner.update(user_id, update).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_write_is_retried_not_lost() {
        let store = RacingStore {
            inner: InMemoryProgressStore::new(),
            raced: AtomicUsize::new(0),
        };
        let clock = FixedClock::at(2024, 5, 1);

        let out = complete_task(&store, &clock, "u1", "this-tab", 30).await.unwrap();
        let p = out.updated_progress;
        assert_eq!(p.xp, 70);
        assert!(p.completed_tasks.contains("this-tab"));
        assert!(p.completed_tasks.contains("other-tab"));
        // first-task was earned by the other tab's write, not this one.
        assert!(out.new_badges.is_empty());
        assert_eq!(p.badges.len(), 1);
    }
}
