use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collectors::runner::{Orchestrator, RunReport, SourceReport};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub status: &'static str,
    /// New jobs per source.
    pub results: BTreeMap<String, usize>,
    pub details: BTreeMap<String, SourceReport>,
    pub scraped_at: DateTime<Utc>,
}

impl From<RunReport> for ScrapeResponse {
    fn from(report: RunReport) -> Self {
        Self {
            status: "completed",
            results: report.new_counts(),
            scraped_at: report.finished_at,
            details: report.sources,
        }
    }
}

/// Run a full scrape and wait for it. Answers 409 while another run is in flight.
pub async fn trigger(
    State(orchestrator): State<Arc<Orchestrator>>,
) -> Result<Json<ScrapeResponse>, AppError> {
    // Detached so a client hanging up does not cancel the run halfway.
    let report = tokio::spawn(async move { orchestrator.try_run().await })
        .await
        .map_err(|e| AppError::Internal(format!("Scrape task failed: {e}")))??;
    Ok(Json(report.into()))
}
