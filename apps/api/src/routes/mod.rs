pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::progress::handlers as progress;
use crate::state::AppState;
use crate::tasks::handlers as tasks;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Task catalog
        .route("/api/v1/tasks/generate", post(tasks::handle_generate_tasks))
        // Progress
        .route("/api/v1/badges", get(progress::handle_list_badges))
        .route(
            "/api/v1/progress/:user_id",
            get(progress::handle_get_progress).post(progress::handle_initialize_progress),
        )
        .route(
            "/api/v1/progress/:user_id/complete",
            post(progress::handle_complete_task),
        )
        .route(
            "/api/v1/xp-meter/preview",
            post(progress::handle_meter_preview),
        )
        .with_state(state)
}
