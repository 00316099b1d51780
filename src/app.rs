//! The polling loop: collect, filter, persist, notify.
//!
//! One cycle per interval. Collector fetches fan out concurrently, but
//! their results are merged before filtering, so the pipeline and its
//! mutation of the dedup cache and history buffer stay single-threaded.
//! A cycle-level failure logs and shortens the next sleep; nothing
//! crashes the loop.

use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::adapter::{BuffCollector, DiscordNotifier, SnapshotWriter};
use crate::config::Config;
use crate::domain::{Deal, DealRecord, FilterPipeline, HistoryBuffer, MarketAnalyzer, ScoredDeal};
use crate::error::Result;
use crate::port::{Collector, LogNotifier, NotifierRegistry};

/// Main application struct.
pub struct App;

struct CycleReport {
    candidates: usize,
    accepted: usize,
}

impl App {
    /// Run the polling loop until the surrounding task is cancelled.
    pub async fn run(config: Config) -> Result<()> {
        let collectors: Vec<Box<dyn Collector>> =
            vec![Box::new(BuffCollector::new(&config.buff))];

        let mut pipeline = FilterPipeline::new(
            MarketAnalyzer::new(),
            config.thresholds.clone(),
            config.dedup.max_entries,
        );
        let mut history = HistoryBuffer::new(config.history.max_entries);
        let writer = SnapshotWriter::new(&config.history.snapshot_path);
        let notifiers = build_notifier_registry();

        let interval = Duration::from_secs(config.poll.interval_secs);
        let retry = Duration::from_secs(config.poll.retry_secs);

        info!(
            collectors = collectors.len(),
            notifiers = notifiers.len(),
            interval_secs = config.poll.interval_secs,
            "monitoring started"
        );

        loop {
            match run_cycle(&collectors, &mut pipeline, &mut history, &writer, &notifiers).await
            {
                Ok(report) => {
                    info!(
                        candidates = report.candidates,
                        accepted = report.accepted,
                        history = history.len(),
                        dedup_keys = pipeline.dedup_len(),
                        "cycle complete"
                    );
                    sleep(interval).await;
                }
                Err(e) => {
                    error!(error = %e, "cycle failed, backing off");
                    sleep(retry).await;
                }
            }
        }
    }
}

fn build_notifier_registry() -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    match DiscordNotifier::from_env() {
        Some(discord) => registry.register(Box::new(discord)),
        None => {
            warn!("DISCORD_WEBHOOK_URL not set, alerts will only be logged");
        }
    }
    registry.register(Box::new(LogNotifier));
    registry
}

async fn run_cycle(
    collectors: &[Box<dyn Collector>],
    pipeline: &mut FilterPipeline,
    history: &mut HistoryBuffer,
    writer: &SnapshotWriter,
    notifiers: &NotifierRegistry,
) -> Result<CycleReport> {
    let candidates = collect_all(collectors).await;
    let candidate_count = candidates.len();

    let accepted = pipeline.filter(candidates);

    history.extend(
        accepted
            .iter()
            .map(|scored| DealRecord::new(&scored.deal, &scored.analysis)),
    );
    writer.write(&history.snapshot()).await?;

    // Notification happens strictly after acceptance and persistence are
    // finalized; failures are logged inside the registry.
    for ScoredDeal { deal, analysis } in &accepted {
        notifiers.notify_all(deal, analysis).await;
    }

    Ok(CycleReport {
        candidates: candidate_count,
        accepted: accepted.len(),
    })
}

/// Fan out to every collector, merging whatever succeeds. A failing
/// collector contributes zero records and is not fatal to the cycle.
async fn collect_all(collectors: &[Box<dyn Collector>]) -> Vec<Deal> {
    let fetches = collectors
        .iter()
        .map(|collector| async move { (collector.name(), collector.fetch_listings().await) });

    let mut merged = Vec::new();
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(deals) => {
                debug!(collector = name, listings = deals.len(), "collector done");
                merged.extend(deals);
            }
            Err(e) => {
                warn!(collector = name, error = %e, "collector failed");
            }
        }
    }
    merged
}
