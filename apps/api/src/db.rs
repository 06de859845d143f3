use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const CREATE_USER_PROGRESS: &str = r#"
CREATE TABLE IF NOT EXISTS user_progress (
    user_id          TEXT PRIMARY KEY,
    xp               BIGINT      NOT NULL DEFAULT 0 CHECK (xp >= 0),
    level            INTEGER     NOT NULL DEFAULT 1 CHECK (level >= 1),
    completed_tasks  TEXT[]      NOT NULL DEFAULT '{}',
    badges           JSONB       NOT NULL DEFAULT '[]'::jsonb,
    streak_days      INTEGER     NOT NULL DEFAULT 0 CHECK (streak_days >= 0),
    last_active_date DATE,
    revision         BIGINT      NOT NULL DEFAULT 0,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `user_progress` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_USER_PROGRESS).execute(pool).await?;
    info!("user_progress table ready");
    Ok(())
}
