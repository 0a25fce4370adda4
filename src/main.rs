mod collectors;
mod config;
mod db;
mod error;
mod models;
mod pipeline;
mod profile;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::collectors::runner::Orchestrator;
use crate::config::{Command, Config};
use crate::profile::Profile;
use crate::routes::api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobfinder=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    let profile = Arc::new(Profile::load(config.profile_path.as_deref())?);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations complete");
    }

    let client = collectors::build_client(Duration::from_secs(config.request_timeout))?;
    let orchestrator = Arc::new(Orchestrator::new(
        collectors::all_collectors(client),
        Arc::new(pool.clone()),
        profile.clone(),
    ));

    match config.resolved_command() {
        Command::Scrape => {
            let report = orchestrator.try_run().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve {
            listen_addr,
            scrape_interval_hours,
        } => {
            if let Some(every) = crate::config::scrape_interval(scrape_interval_hours) {
                tracing::info!("Scraping every {scrape_interval_hours}h");
                orchestrator.clone().spawn_schedule(every);
            }

            let app = routes::app(AppState {
                pool,
                orchestrator,
                profile,
            })
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
