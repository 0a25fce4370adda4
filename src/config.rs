use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobfinder", about = "Job listing ingestion and relevance scoring")]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true")]
    pub run_migrations: bool,

    /// JSON file overriding the built-in candidate profile
    #[arg(long, env = "PROFILE_PATH")]
    pub profile_path: Option<PathBuf>,

    /// Timeout for each request to a job board, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "15")]
    pub request_timeout: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,

        /// Hours between background scrapes, 0 to disable
        #[arg(long, env = "SCRAPE_INTERVAL_HOURS", default_value = "6")]
        scrape_interval_hours: u64,
    },
    /// Scrape every job board once and print the per-source report
    Scrape,
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            scrape_interval_hours: std::env::var("SCRAPE_INTERVAL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
        })
    }
}

/// Period of the background scrape, or `None` when it is disabled.
pub fn scrape_interval(hours: u64) -> Option<Duration> {
    (hours > 0).then(|| Duration::from_secs(hours.saturating_mul(3600)))
}
