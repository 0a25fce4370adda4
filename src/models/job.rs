use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::listing::NormalizedJob;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub fingerprint: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub snippet: Option<String>,
    pub url: String,
    pub source: String,
    pub score: i32,
    pub category: String,
    pub city: String,
    pub posting_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_raw: Option<String>,
    pub date_posted: Option<String>,
    pub found_at: DateTime<Utc>,
    pub is_new: bool,
    pub is_hidden: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub source: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub posting_type: Option<String>,
    pub company: Option<String>,
    pub min_salary: Option<i32>,
    #[serde(default)]
    pub only_new: bool,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl JobFilters {
    /// Treat empty query-string values as "no filter".
    pub fn cleaned(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            source: keep(self.source),
            search: keep(self.search).map(|s| escape_like(&s)),
            category: keep(self.category),
            city: keep(self.city),
            posting_type: keep(self.posting_type),
            company: keep(self.company),
            sort: keep(self.sort),
            ..self
        }
    }

    fn order_by(&self) -> &'static str {
        match self.sort.as_deref() {
            Some("newest") => "found_at DESC, score DESC",
            Some("salary") => "salary_max DESC NULLS LAST, score DESC",
            _ => "score DESC, found_at DESC",
        }
    }
}

/// Escape LIKE wildcards so user search text matches literally. Postgres
/// uses backslash as the default LIKE escape character.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Shared WHERE clause for listing and counting. Rows without a salary are
/// kept by the salary floor.
const FILTER_CLAUSE: &str = "is_hidden = FALSE \
    AND ($1::text IS NULL OR source = $1) \
    AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%' OR company ILIKE '%' || $2 || '%' OR snippet ILIKE '%' || $2 || '%') \
    AND ($3::text IS NULL OR category = $3) \
    AND ($4::text IS NULL OR city = $4) \
    AND ($5::text IS NULL OR posting_type = $5) \
    AND ($6::text IS NULL OR company = $6) \
    AND ($7::int IS NULL OR salary_max >= $7 OR salary_min IS NULL) \
    AND ($8::bool = FALSE OR is_new = TRUE)";

#[derive(Debug, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct FilterCounts {
    pub categories: Vec<FacetCount>,
    pub cities: Vec<FacetCount>,
    pub posting_types: Vec<FacetCount>,
    pub sources: Vec<FacetCount>,
    pub companies: Vec<FacetCount>,
}

#[derive(Debug, Serialize)]
pub struct JobStats {
    pub total: i64,
    pub new: i64,
    pub by_source: Vec<FacetCount>,
}

impl Job {
    /// Insert a job unless its fingerprint is already stored.
    /// Returns `true` when a new row was written.
    pub async fn upsert(pool: &PgPool, job: &NormalizedJob) -> Result<bool, AppError> {
        let listing = &job.listing;
        let row: Option<(i32,)> = sqlx::query_as(
            "INSERT INTO jobs (fingerprint, title, company, location, snippet, url, source, score, category, city, posting_type, salary_min, salary_max, salary_raw, date_posted) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) ON CONFLICT (fingerprint) DO NOTHING RETURNING id",
        )
        .bind(&listing.fingerprint)
        .bind(&listing.title)
        .bind(&listing.company)
        .bind(&listing.location)
        .bind(&listing.snippet)
        .bind(&listing.link)
        .bind(listing.source.as_str())
        .bind(job.score)
        .bind(&job.category)
        .bind(&job.city)
        .bind(job.posting_type.as_str())
        .bind(job.salary.as_ref().map(|s| s.min))
        .bind(job.salary.as_ref().map(|s| s.max))
        .bind(job.salary.as_ref().map(|s| s.raw.clone()))
        .bind(&listing.date_posted)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    pub async fn list(pool: &PgPool, filters: &JobFilters) -> Result<Vec<Job>, AppError> {
        let limit = filters.limit.unwrap_or(200).clamp(1, 500);
        let offset = filters.offset.unwrap_or(0).max(0);
        let sql = format!(
            "SELECT * FROM jobs WHERE {FILTER_CLAUSE} ORDER BY {} LIMIT $9 OFFSET $10",
            filters.order_by()
        );

        let jobs = sqlx::query_as::<_, Job>(&sql)
            .bind(&filters.source)
            .bind(&filters.search)
            .bind(&filters.category)
            .bind(&filters.city)
            .bind(&filters.posting_type)
            .bind(&filters.company)
            .bind(filters.min_salary)
            .bind(filters.only_new)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    pub async fn count_filtered(pool: &PgPool, filters: &JobFilters) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM jobs WHERE {FILTER_CLAUSE}");
        let row: (i64,) = sqlx::query_as(&sql)
            .bind(&filters.source)
            .bind(&filters.search)
            .bind(&filters.category)
            .bind(&filters.city)
            .bind(&filters.posting_type)
            .bind(&filters.company)
            .bind(filters.min_salary)
            .bind(filters.only_new)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
    }

    pub async fn hide(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE jobs SET is_hidden = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job {id} not found")));
        }
        Ok(())
    }

    pub async fn mark_all_seen(pool: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE jobs SET is_new = FALSE WHERE is_new = TRUE")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn facet(pool: &PgPool, column: &str, limit: i64) -> Result<Vec<FacetCount>, AppError> {
        let sql = format!(
            "SELECT {column}, COUNT(*) FROM jobs WHERE is_hidden = FALSE AND {column} IS NOT NULL AND {column} <> '' GROUP BY {column} ORDER BY COUNT(*) DESC, {column} LIMIT $1"
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql).bind(limit).fetch_all(pool).await?;
        Ok(rows
            .into_iter()
            .map(|(value, count)| FacetCount { value, count })
            .collect())
    }

    pub async fn filter_counts(pool: &PgPool) -> Result<FilterCounts, AppError> {
        Ok(FilterCounts {
            categories: Self::facet(pool, "category", 100).await?,
            cities: Self::facet(pool, "city", 100).await?,
            posting_types: Self::facet(pool, "posting_type", 10).await?,
            sources: Self::facet(pool, "source", 20).await?,
            companies: Self::facet(pool, "company", 50).await?,
        })
    }

    pub async fn stats(pool: &PgPool) -> Result<JobStats, AppError> {
        let (total, new): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_new) FROM jobs WHERE is_hidden = FALSE",
        )
        .fetch_one(pool)
        .await?;
        Ok(JobStats {
            total,
            new,
            by_source: Self::facet(pool, "source", 20).await?,
        })
    }
}

/// Idempotent write side of job storage, keyed by fingerprint.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Returns `true` when the job was not stored before.
    async fn upsert(&self, job: &NormalizedJob) -> Result<bool, AppError>;
}

#[async_trait]
impl JobStore for PgPool {
    async fn upsert(&self, job: &NormalizedJob) -> Result<bool, AppError> {
        Job::upsert(self, job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_wildcards_are_escaped() {
        let filters = JobFilters {
            search: Some("100%_sure\\".to_string()),
            ..JobFilters::default()
        }
        .cleaned();
        assert_eq!(filters.search.as_deref(), Some(r"100\%\_sure\\"));
    }

    #[test]
    fn blank_filters_are_dropped() {
        let filters = JobFilters {
            source: Some("  ".to_string()),
            search: Some(String::new()),
            city: Some("Haarlem".to_string()),
            ..JobFilters::default()
        }
        .cleaned();
        assert_eq!(filters.source, None);
        assert_eq!(filters.search, None);
        assert_eq!(filters.city.as_deref(), Some("Haarlem"));
    }

    #[test]
    fn sort_orders() {
        let sorted = |sort: &str| JobFilters {
            sort: Some(sort.to_string()),
            ..JobFilters::default()
        };
        assert_eq!(sorted("newest").order_by(), "found_at DESC, score DESC");
        assert_eq!(sorted("salary").order_by(), "salary_max DESC NULLS LAST, score DESC");
        assert_eq!(JobFilters::default().order_by(), "score DESC, found_at DESC");
    }
}
