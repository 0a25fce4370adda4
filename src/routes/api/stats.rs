use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::collectors::runner::Orchestrator;
use crate::error::AppError;
use crate::models::job::{Job, JobStats};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: JobStats,
    pub last_scrape: Option<DateTime<Utc>>,
    pub scraping: bool,
}

pub async fn get(
    State(pool): State<PgPool>,
    State(orchestrator): State<Arc<Orchestrator>>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = Job::stats(&pool).await?;
    Ok(Json(StatsResponse {
        stats,
        last_scrape: orchestrator.last_run(),
        scraping: orchestrator.is_running(),
    }))
}
