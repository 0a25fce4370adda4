use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::job::{FilterCounts, Job, JobFilters};
use crate::pipeline::posting_age::{self, Freshness};
use crate::pipeline::scoring::{self, ScoreBreakdown};
use crate::profile::Profile;

/// A stored job plus its posting age, computed when read.
#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub posting_age_text: String,
    pub posting_age_color: Freshness,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let age = posting_age::estimate(job.date_posted.as_deref());
        Self {
            job,
            posting_age_text: age.text,
            posting_age_color: age.color,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobPage {
    pub jobs: Vec<JobView>,
    pub total: i64,
}

pub async fn list(
    State(pool): State<PgPool>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<JobPage>, AppError> {
    let filters = filters.cleaned();
    let jobs = Job::list(&pool, &filters).await?;
    let total = Job::count_filtered(&pool, &filters).await?;
    Ok(Json(JobPage {
        jobs: jobs.into_iter().map(JobView::from).collect(),
        total,
    }))
}

pub async fn get(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<Json<JobView>, AppError> {
    let job = Job::get(&pool, id).await?;
    Ok(Json(job.into()))
}

/// Recompute the score of a stored job, component by component.
pub async fn score(
    State(pool): State<PgPool>,
    State(profile): State<Arc<Profile>>,
    Path(id): Path<i32>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let job = Job::get(&pool, id).await?;
    Ok(Json(scoring::breakdown(
        &profile.scoring,
        &job.title,
        job.company.as_deref().unwrap_or_default(),
        job.location.as_deref().unwrap_or_default(),
        job.snippet.as_deref().unwrap_or_default(),
    )))
}

pub async fn hide(
    State(pool): State<PgPool>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    Job::hide(&pool, id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn mark_seen(State(pool): State<PgPool>) -> Result<Json<serde_json::Value>, AppError> {
    let updated = Job::mark_all_seen(&pool).await?;
    Ok(Json(json!({ "status": "ok", "updated": updated })))
}

pub async fn filters(State(pool): State<PgPool>) -> Result<Json<FilterCounts>, AppError> {
    Ok(Json(Job::filter_counts(&pool).await?))
}
