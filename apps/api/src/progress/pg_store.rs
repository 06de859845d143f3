//! PostgreSQL progress store. One row per user in `user_progress`.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::progress::{EarnedBadge, ProgressUpdate, UserProgress};
use crate::progress::store::ProgressStore;

#[derive(Debug, FromRow)]
struct ProgressRow {
    user_id: String,
    xp: i64,
    level: i32,
    completed_tasks: Vec<String>,
    badges: Json<Vec<EarnedBadge>>,
    streak_days: i32,
    last_active_date: Option<NaiveDate>,
    revision: i64,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for UserProgress {
    type Error = AppError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(UserProgress {
            xp: u32::try_from(row.xp).context("xp column out of range")?,
            level: u32::try_from(row.level).context("level column out of range")?,
            completed_tasks: row.completed_tasks.into_iter().collect(),
            badges: row.badges.0,
            streak_days: u32::try_from(row.streak_days)
                .context("streak_days column out of range")?,
            last_active_date: row.last_active_date,
            revision: u64::try_from(row.revision).context("revision column out of range")?,
            user_id: row.user_id,
        })
    }
}

pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<UserProgress>, AppError> {
        sqlx::query_as::<_, ProgressRow>("SELECT * FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserProgress::try_from)
            .transpose()
    }

    /// Inserts the zero state; `None` if a row already existed.
    async fn insert_zero_state(&self, user_id: &str) -> Result<Option<UserProgress>, AppError> {
        sqlx::query_as::<_, ProgressRow>(
            r#"
            INSERT INTO user_progress (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(UserProgress::try_from)
        .transpose()
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn get_or_create(&self, user_id: &str) -> Result<UserProgress, AppError> {
        if let Some(created) = self.insert_zero_state(user_id).await? {
            info!("Created progress record for user {user_id}");
            return Ok(created);
        }
        self.fetch(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No progress for user {user_id}")))
    }

    async fn initialize(&self, user_id: &str) -> Result<UserProgress, AppError> {
        let created = self.insert_zero_state(user_id).await?.ok_or_else(|| {
            AppError::AlreadyExists(format!("Progress for user {user_id} already exists"))
        })?;
        info!("Initialized progress record for user {user_id}");
        Ok(created)
    }

    async fn update(
        &self,
        user_id: &str,
        update: ProgressUpdate,
    ) -> Result<UserProgress, AppError> {
        let expected_revision = update
            .expected_revision
            .map(i64::try_from)
            .transpose()
            .context("expected_revision out of range")?;
        let xp = update.xp.map(i64::from);
        let level = update
            .level
            .map(i32::try_from)
            .transpose()
            .context("level out of range")?;
        let streak_days = update
            .streak_days
            .map(i32::try_from)
            .transpose()
            .context("streak_days out of range")?;
        let completed_tasks: Option<Vec<String>> =
            update.completed_tasks.map(|set| set.into_iter().collect());

        // COALESCE keeps columns whose update field is NULL.
        let updated = sqlx::query_as::<_, ProgressRow>(
            r#"
            UPDATE user_progress SET
                xp               = COALESCE($2, xp),
                level            = COALESCE($3, level),
                completed_tasks  = COALESCE($4, completed_tasks),
                badges           = COALESCE($5, badges),
                streak_days      = COALESCE($6, streak_days),
                last_active_date = COALESCE($7, last_active_date),
                revision         = revision + 1,
                updated_at       = NOW()
            WHERE user_id = $1
              AND ($8::BIGINT IS NULL OR revision = $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(xp)
        .bind(level)
        .bind(completed_tasks)
        .bind(update.badges.map(Json))
        .bind(streak_days)
        .bind(update.last_active_date)
        .bind(expected_revision)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => row.try_into(),
            None => match self.fetch(user_id).await? {
                None => Err(AppError::NotFound(format!("No progress for user {user_id}"))),
                Some(stored) => Err(AppError::Conflict(format!(
                    "Progress for user {} changed (revision {} != expected {:?})",
                    user_id, stored.revision, update.expected_revision
                ))),
            },
        }
    }
}
