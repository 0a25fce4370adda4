// Job board collectors and the orchestrator that runs them.

pub mod boards;
pub mod html;
pub mod runner;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::listing::{RawListing, Source};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// One query/area combination to run against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub query: String,
    pub area: String,
}

/// Trait that all job collectors must implement.
///
/// `fetch` returns an empty list when a search has no results and an error
/// only for transport or parse failures.
#[async_trait]
pub trait JobCollector: Send + Sync {
    fn source(&self) -> Source;

    /// Searches to run, in order, for a full scrape of this source.
    fn searches(&self) -> Vec<Search>;

    async fn fetch(&self, query: &str, area: &str) -> Result<Vec<RawListing>, AppError>;
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Every configured job board, sharing one HTTP client.
pub fn all_collectors(client: reqwest::Client) -> Vec<Arc<dyn JobCollector>> {
    boards::BOARDS
        .iter()
        .map(|board| Arc::new(html::HtmlCollector::new(board, client.clone())) as Arc<dyn JobCollector>)
        .collect()
}
