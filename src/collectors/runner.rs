use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::collectors::JobCollector;
use crate::error::AppError;
use crate::models::job::JobStore;
use crate::pipeline;
use crate::pipeline::normalize::normalize;
use crate::profile::Profile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    /// Distinct listings scraped.
    pub found: usize,
    pub excluded: usize,
    pub new: usize,
    pub duplicates: usize,
    pub error: Option<String>,
}

impl SourceReport {
    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub finished_at: DateTime<Utc>,
    pub sources: BTreeMap<String, SourceReport>,
}

impl RunReport {
    /// New rows written per source.
    pub fn new_counts(&self) -> BTreeMap<String, usize> {
        self.sources
            .iter()
            .map(|(source, report)| (source.clone(), report.new))
            .collect()
    }
}

#[derive(Debug, Default)]
struct RunState {
    running: AtomicBool,
    last_report: Mutex<Option<RunReport>>,
}

/// Clears the running flag however the run ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs every collector through the pipeline into the store, one task per
/// source. At most one run is in flight at a time.
pub struct Orchestrator {
    collectors: Vec<Arc<dyn JobCollector>>,
    store: Arc<dyn JobStore>,
    profile: Arc<Profile>,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        collectors: Vec<Arc<dyn JobCollector>>,
        store: Arc<dyn JobStore>,
        profile: Arc<Profile>,
    ) -> Self {
        Self {
            collectors,
            store,
            profile,
            state: RunState::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_report().map(|report| report.finished_at)
    }

    pub fn last_report(&self) -> Option<RunReport> {
        self.state
            .last_report
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Start a full run, or fail with `Conflict` if one is already going.
    pub async fn try_run(&self) -> Result<RunReport, AppError> {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Conflict("Scrape already running".to_string()));
        }
        let _guard = RunGuard(&self.state.running);

        tracing::info!("Starting scrape of {} sources", self.collectors.len());

        let (sources, handles): (Vec<_>, Vec<_>) = self
            .collectors
            .iter()
            .map(|collector| {
                let task = run_source(
                    collector.clone(),
                    self.store.clone(),
                    self.profile.clone(),
                );
                (collector.source(), tokio::spawn(task))
            })
            .unzip();

        let results = futures::future::join_all(handles).await;

        let mut report = RunReport {
            finished_at: Utc::now(),
            sources: BTreeMap::new(),
        };
        for (source, result) in sources.into_iter().zip(results) {
            let source_report = result.unwrap_or_else(|e| {
                tracing::error!("Scraper {source} crashed: {e}");
                SourceReport::failed(format!("scraper task failed: {e}"))
            });
            report.sources.insert(source.to_string(), source_report);
        }

        let total_new: usize = report.sources.values().map(|r| r.new).sum();
        tracing::info!("Scrape finished: {total_new} new jobs");

        *self
            .state
            .last_report
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(report.clone());
        Ok(report)
    }

    /// Run on a fixed interval in the background. The first run happens one
    /// interval after startup.
    pub fn spawn_schedule(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.try_run().await {
                    Ok(_) => {}
                    Err(AppError::Conflict(_)) => {
                        tracing::info!("Scheduled scrape skipped: a scrape is already running");
                    }
                    Err(e) => tracing::warn!("Scheduled scrape failed: {e}"),
                }
            }
        })
    }
}

async fn run_source(
    collector: Arc<dyn JobCollector>,
    store: Arc<dyn JobStore>,
    profile: Arc<Profile>,
) -> SourceReport {
    let source = collector.source();
    let searches = collector.searches();
    tracing::info!("Scraping {source} ({} searches)", searches.len());

    let mut scraped = Vec::new();
    let mut failures = 0usize;
    for search in &searches {
        match collector.fetch(&search.query, &search.area).await {
            Ok(listings) => scraped.extend(listings),
            Err(e) => {
                failures += 1;
                tracing::warn!(
                    "{source} search '{}' in {} failed: {e}",
                    search.query,
                    search.area
                );
            }
        }
    }

    if failures > 0 && failures == searches.len() {
        tracing::error!("Scraper {source} failed: all {failures} searches failed");
        return SourceReport::failed(format!("all {failures} searches failed"));
    }

    let mut report = SourceReport::default();
    let mut seen = HashSet::new();
    for raw in scraped {
        if raw.title.trim().is_empty() {
            continue;
        }
        let listing = normalize(raw);
        if !seen.insert(listing.fingerprint.clone()) {
            continue;
        }
        report.found += 1;

        let Some(job) = pipeline::evaluate(&profile, listing) else {
            report.excluded += 1;
            continue;
        };

        match store.upsert(&job).await {
            Ok(true) => report.new += 1,
            Ok(false) => report.duplicates += 1,
            Err(e) => tracing::warn!("Failed to store {source} job '{}': {e}", job.listing.title),
        }
    }

    tracing::info!(
        "{source}: {} found, {} excluded, {} new, {} duplicates",
        report.found,
        report.excluded,
        report.new,
        report.duplicates
    );
    report
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::collectors::Search;
    use crate::models::listing::{NormalizedJob, RawListing, Source};

    #[derive(Default)]
    struct MemoryStore {
        fingerprints: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl JobStore for MemoryStore {
        async fn upsert(&self, job: &NormalizedJob) -> Result<bool, AppError> {
            Ok(self
                .fingerprints
                .lock()
                .unwrap()
                .insert(job.listing.fingerprint.clone()))
        }
    }

    fn listing(source: Source, title: &str, link: &str) -> RawListing {
        RawListing {
            title: title.to_string(),
            company: Some("Acme BV".to_string()),
            location: Some("Haarlem".to_string()),
            snippet: Some("International team".to_string()),
            link: link.to_string(),
            source,
            date_posted: None,
        }
    }

    fn one_search() -> Vec<Search> {
        vec![Search {
            query: "accountant".to_string(),
            area: "Haarlem".to_string(),
        }]
    }

    struct StubCollector {
        source: Source,
        listings: Vec<RawListing>,
    }

    #[async_trait]
    impl JobCollector for StubCollector {
        fn source(&self) -> Source {
            self.source
        }
        fn searches(&self) -> Vec<Search> {
            one_search()
        }
        async fn fetch(&self, _query: &str, _area: &str) -> Result<Vec<RawListing>, AppError> {
            Ok(self.listings.clone())
        }
    }

    struct FailingCollector(Source);

    #[async_trait]
    impl JobCollector for FailingCollector {
        fn source(&self) -> Source {
            self.0
        }
        fn searches(&self) -> Vec<Search> {
            one_search()
        }
        async fn fetch(&self, _query: &str, _area: &str) -> Result<Vec<RawListing>, AppError> {
            Err(AppError::Upstream("connection reset".to_string()))
        }
    }

    struct PanickingCollector(Source);

    #[async_trait]
    impl JobCollector for PanickingCollector {
        fn source(&self) -> Source {
            self.0
        }
        fn searches(&self) -> Vec<Search> {
            one_search()
        }
        async fn fetch(&self, _query: &str, _area: &str) -> Result<Vec<RawListing>, AppError> {
            panic!("selector blew up")
        }
    }

    /// Fails the first search and succeeds on the second.
    struct FlakyCollector;

    #[async_trait]
    impl JobCollector for FlakyCollector {
        fn source(&self) -> Source {
            Source::IamExpat
        }
        fn searches(&self) -> Vec<Search> {
            ["bad", "good"]
                .iter()
                .map(|q| Search {
                    query: q.to_string(),
                    area: "Haarlem".to_string(),
                })
                .collect()
        }
        async fn fetch(&self, query: &str, _area: &str) -> Result<Vec<RawListing>, AppError> {
            if query == "bad" {
                return Err(AppError::Upstream("503".to_string()));
            }
            Ok(vec![listing(Source::IamExpat, "Bookkeeper", "https://iamexpat.nl/1")])
        }
    }

    struct GatedCollector {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl JobCollector for GatedCollector {
        fn source(&self) -> Source {
            Source::Adams
        }
        fn searches(&self) -> Vec<Search> {
            one_search()
        }
        async fn fetch(&self, _query: &str, _area: &str) -> Result<Vec<RawListing>, AppError> {
            self.gate.notified().await;
            Ok(vec![listing(Source::Adams, "Accountant", "https://adams.example/1")])
        }
    }

    fn indeed_stub() -> Arc<dyn JobCollector> {
        Arc::new(StubCollector {
            source: Source::Indeed,
            listings: vec![
                listing(Source::Indeed, "Accountant", "https://indeed.example/1"),
                listing(Source::Indeed, "Bookkeeper", "https://indeed.example/2"),
                // Same link as the first card: one identity.
                listing(Source::Indeed, "Accountant", "https://indeed.example/1"),
                listing(Source::Indeed, "Finance Director", "https://indeed.example/3"),
                listing(Source::Indeed, "   ", "https://indeed.example/4"),
            ],
        })
    }

    fn orchestrator(collectors: Vec<Arc<dyn JobCollector>>) -> Orchestrator {
        Orchestrator::new(
            collectors,
            Arc::new(MemoryStore::default()),
            Arc::new(Profile::default()),
        )
    }

    #[tokio::test]
    async fn counts_new_excluded_and_deduplicated_jobs() {
        let orch = orchestrator(vec![indeed_stub()]);
        let report = orch.try_run().await.unwrap();
        let indeed = &report.sources["indeed"];
        assert_eq!(indeed.found, 3);
        assert_eq!(indeed.excluded, 1);
        assert_eq!(indeed.new, 2);
        assert_eq!(indeed.duplicates, 0);
        assert_eq!(indeed.error, None);
    }

    #[tokio::test]
    async fn failing_sources_do_not_affect_the_others() {
        let orch = orchestrator(vec![
            indeed_stub(),
            Arc::new(FailingCollector(Source::LinkedIn)),
            Arc::new(PanickingCollector(Source::Undutchables)),
        ]);
        let report = orch.try_run().await.unwrap();

        assert_eq!(report.sources["indeed"].new, 2);
        assert_eq!(report.sources["linkedin"].new, 0);
        assert!(report.sources["linkedin"].error.is_some());
        assert_eq!(report.sources["undutchables"].new, 0);
        assert!(report.sources["undutchables"].error.is_some());

        let counts = report.new_counts();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["indeed"], 2);
        assert!(!orch.is_running());
    }

    #[tokio::test]
    async fn one_failed_search_keeps_the_rest_of_the_source() {
        let orch = orchestrator(vec![Arc::new(FlakyCollector)]);
        let report = orch.try_run().await.unwrap();
        let iamexpat = &report.sources["iamexpat"];
        assert_eq!(iamexpat.new, 1);
        assert_eq!(iamexpat.error, None);
    }

    #[tokio::test]
    async fn rerunning_adds_nothing_new() {
        let orch = orchestrator(vec![indeed_stub()]);
        orch.try_run().await.unwrap();
        let second = orch.try_run().await.unwrap();
        assert_eq!(second.sources["indeed"].new, 0);
        assert_eq!(second.sources["indeed"].duplicates, 2);
    }

    #[tokio::test]
    async fn second_run_is_rejected_while_one_is_in_flight() {
        let gate = Arc::new(Notify::new());
        let orch = Arc::new(orchestrator(vec![Arc::new(GatedCollector {
            gate: gate.clone(),
        })]));

        let first = tokio::spawn({
            let orch = orch.clone();
            async move { orch.try_run().await }
        });
        while !orch.is_running() {
            tokio::task::yield_now().await;
        }

        let second = orch.try_run().await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        gate.notify_one();
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.sources["adams"].new, 1);
        assert!(!orch.is_running());
        assert_eq!(orch.last_run(), Some(report.finished_at));

        // The flag is released, so a new run starts normally.
        gate.notify_one();
        let third = orch.try_run().await.unwrap();
        assert_eq!(third.sources["adams"].duplicates, 1);
    }
}
