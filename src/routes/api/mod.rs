pub mod applications;
pub mod jobs;
pub mod scrape;
pub mod stats;

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post, put};
use sqlx::PgPool;

use crate::collectors::runner::Orchestrator;
use crate::profile::Profile;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: PgPool,
    pub orchestrator: Arc<Orchestrator>,
    pub profile: Arc<Profile>,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Jobs
        .route("/jobs", get(jobs::list))
        .route("/jobs/mark-seen", post(jobs::mark_seen))
        .route("/jobs/{id}", get(jobs::get))
        .route("/jobs/{id}/score", get(jobs::score))
        .route("/jobs/{id}/hide", post(jobs::hide))
        .route("/filters", get(jobs::filters))
        // Ingestion
        .route("/stats", get(stats::get))
        .route("/scrape", post(scrape::trigger))
        // Applications
        .route("/applications", get(applications::list))
        .route("/applications/{job_id}/save", post(applications::save))
        .route(
            "/applications/{job_id}",
            put(applications::update).delete(applications::remove),
        )
        .with_state(state);

    Router::new().nest("/api", api)
}
