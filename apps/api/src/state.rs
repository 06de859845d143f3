use std::sync::Arc;

use crate::config::Config;
use crate::progress::{Clock, ProgressStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable progress backend. Selected at startup via PROGRESS_BACKEND.
    pub store: Arc<dyn ProgressStore>,
    /// UTC clock used for streak dates and badge timestamps.
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}
