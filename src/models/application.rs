use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

pub const STATUSES: [&str; 5] = ["interested", "applied", "interview", "offer", "rejected"];

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Application {
    pub id: i32,
    pub job_id: i32,
    pub status: String,
    pub notes: String,
    pub reminder_date: Option<NaiveDate>,
    pub applied_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved application joined with the job it refers to.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ApplicationWithJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub source: String,
    pub score: i32,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplication {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub applied_at: Option<NaiveDate>,
}

impl Application {
    /// Save a job to the tracker. Returns `false` if it was already saved.
    pub async fn save(pool: &PgPool, job_id: i32) -> Result<bool, AppError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "INSERT INTO applications (job_id) SELECT id FROM jobs WHERE id = $1 ON CONFLICT (job_id) DO NOTHING RETURNING id",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
        if row.is_some() {
            return Ok(true);
        }
        // Either already saved or the job does not exist.
        match Self::get_by_job(pool, job_id).await {
            Ok(_) => Ok(false),
            Err(AppError::NotFound(_)) => Err(AppError::NotFound(format!("Job {job_id} not found"))),
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_job(pool: &PgPool, job_id: i32) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No application for job {job_id}")))
    }

    pub async fn update(
        pool: &PgPool,
        job_id: i32,
        input: UpdateApplication,
    ) -> Result<Application, AppError> {
        if let Some(status) = &input.status
            && !STATUSES.contains(&status.as_str())
        {
            return Err(AppError::BadRequest(format!("Unknown status '{status}'")));
        }

        let existing = Self::get_by_job(pool, job_id).await?;
        let app = sqlx::query_as::<_, Application>(
            "UPDATE applications SET status = $2, notes = $3, reminder_date = $4, applied_at = $5, updated_at = NOW() WHERE job_id = $1 RETURNING *",
        )
        .bind(job_id)
        .bind(input.status.unwrap_or(existing.status))
        .bind(input.notes.unwrap_or(existing.notes))
        .bind(input.reminder_date.or(existing.reminder_date))
        .bind(input.applied_at.or(existing.applied_at))
        .fetch_one(pool)
        .await?;
        Ok(app)
    }

    pub async fn remove(pool: &PgPool, job_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(job_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("No application for job {job_id}")));
        }
        Ok(())
    }

    /// All saved applications, furthest along the pipeline first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ApplicationWithJob>, AppError> {
        let apps = sqlx::query_as::<_, ApplicationWithJob>(
            "SELECT a.*, j.title, j.company, j.location, j.url, j.source, j.score, j.salary_min, j.salary_max
             FROM applications a
             JOIN jobs j ON a.job_id = j.id
             ORDER BY
                CASE a.status
                    WHEN 'offer' THEN 1
                    WHEN 'interview' THEN 2
                    WHEN 'applied' THEN 3
                    WHEN 'interested' THEN 4
                    WHEN 'rejected' THEN 5
                    ELSE 6
                END,
                a.created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(apps)
    }
}
