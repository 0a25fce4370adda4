use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::application::{Application, UpdateApplication};

pub async fn list(State(pool): State<PgPool>) -> Result<Json<serde_json::Value>, AppError> {
    let apps = Application::list(&pool).await?;
    Ok(Json(json!({ "applications": apps })))
}

pub async fn save(
    State(pool): State<PgPool>,
    Path(job_id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let created = Application::save(&pool, job_id).await?;
    let status = if created { "created" } else { "exists" };
    Ok(Json(json!({ "status": status })))
}

pub async fn update(
    State(pool): State<PgPool>,
    Path(job_id): Path<i32>,
    Json(input): Json<UpdateApplication>,
) -> Result<Json<Application>, AppError> {
    let app = Application::update(&pool, job_id, input).await?;
    Ok(Json(app))
}

pub async fn remove(
    State(pool): State<PgPool>,
    Path(job_id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    Application::remove(&pool, job_id).await?;
    Ok(Json(json!({ "status": "ok" })))
}
