pub mod api;
pub mod ui;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use sqlx::PgPool;

use crate::routes::api::AppState;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(pool: PgPool) -> impl IntoResponse {
    let result: Result<(i32,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;
    match result {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

/// Every route of the service, without middleware.
pub fn app(state: AppState) -> Router {
    let readyz_pool = state.pool.clone();
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(move || readyz(readyz_pool.clone())))
        .merge(ui::router())
        .merge(api::router(state))
}
