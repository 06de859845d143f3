//! Axum route handlers for the Progress API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::progress::UserProgress;
use crate::progress::badges::{BadgeDefinition, BADGE_CATALOG};
use crate::progress::completion::{complete_task, CompletionOutcome};
use crate::progress::leveling::{level_summary, LevelSummary};
use crate::progress::ui_meter::{MeterAdvance, XpMeter};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: UserProgress,
    pub level: LevelSummary,
}

impl From<UserProgress> for ProgressResponse {
    fn from(progress: UserProgress) -> Self {
        let level = level_summary(progress.xp);
        Self { progress, level }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub task_id: String,
    pub task_xp: u32,
}

#[derive(Debug, Deserialize)]
pub struct MeterPreviewRequest {
    #[serde(default)]
    pub meter: XpMeter,
    pub gained_xp: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/progress/:user_id
///
/// Returns the user's progress, creating the zero state on first access.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProgressResponse>, AppError> {
    require_user_id(&user_id)?;
    let progress = state.store.get_or_create(&user_id).await?;
    Ok(Json(progress.into()))
}

/// POST /api/v1/progress/:user_id
///
/// Explicitly creates the zero state. 409 if the user already has progress.
pub async fn handle_initialize_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<ProgressResponse>), AppError> {
    require_user_id(&user_id)?;
    let progress = state.store.initialize(&user_id).await?;
    Ok((StatusCode::CREATED, Json(progress.into())))
}

/// POST /api/v1/progress/:user_id/complete
///
/// Awards XP for a task, updates streak and badges. 409 on a repeat completion.
pub async fn handle_complete_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> Result<Json<CompletionOutcome>, AppError> {
    let Json(request) = payload?;
    let outcome = complete_task(
        state.store.as_ref(),
        state.clock.as_ref(),
        &user_id,
        &request.task_id,
        request.task_xp,
    )
    .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/badges
pub async fn handle_list_badges() -> Json<&'static [BadgeDefinition]> {
    Json(BADGE_CATALOG)
}

/// POST /api/v1/xp-meter/preview
///
/// Stateless: advances the cosmetic meter the client sends and returns it.
/// 400 if the meter is off-curve or the gain is oversized.
pub async fn handle_meter_preview(
    payload: Result<Json<MeterPreviewRequest>, JsonRejection>,
) -> Result<Json<MeterAdvance>, AppError> {
    let Json(request) = payload?;
    request.meter.validate(request.gained_xp)?;
    Ok(Json(request.meter.gain(request.gained_xp)))
}

fn require_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    Ok(())
}
