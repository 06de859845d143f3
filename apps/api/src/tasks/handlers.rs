//! Axum route handlers for the task catalog.

use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::OnboardingProfile;
use crate::models::task::Task;
use crate::tasks::catalog::generate_tasks;

#[derive(Debug, Serialize)]
pub struct GenerateTasksResponse {
    pub tasks: Vec<Task>,
}

/// POST /api/v1/tasks/generate
///
/// Builds the starter task list from onboarding answers. Unrecognised answers
/// fall through to the wellness fallback; only a malformed body is rejected.
pub async fn handle_generate_tasks(
    payload: Result<Json<OnboardingProfile>, JsonRejection>,
) -> Result<Json<GenerateTasksResponse>, AppError> {
    let Json(profile) = payload?;
    let tasks = generate_tasks(&profile);
    debug!("Generated {} tasks from onboarding profile", tasks.len());
    Ok(Json(GenerateTasksResponse { tasks }))
}
