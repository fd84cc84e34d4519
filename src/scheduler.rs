//! Scheduled batch runner for the daily feedback-processing pass
//!
//! A cancellable periodic task owned by the process: started at boot,
//! stopped at shutdown. Each firing loads every stored feedback event and
//! hands the batch to an injected [`FeedbackProcessor`]. Failures inside one
//! pass are caught at the task boundary, logged, and swallowed so they can
//! never crash the host process or block the next firing.

use crate::error::Result;
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, Polarity};
use async_trait::async_trait;
use chrono::{DateTime, Days, Local, LocalResult, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Fallback wait when the next local midnight cannot be represented
/// (DST gaps); roughly daily is all the contract asks for.
const FALLBACK_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Counts produced by one processing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub positive: usize,
    pub negative: usize,
}

impl PassReport {
    pub fn total(&self) -> usize {
        self.positive + self.negative
    }
}

/// Strategy invoked on each scheduled pass.
///
/// This is the extension point for richer processing (trend analysis,
/// model adjustment); the shipped implementation only counts.
#[async_trait]
pub trait FeedbackProcessor: Send + Sync {
    async fn process(&self, events: &[FeedbackEvent]) -> Result<PassReport>;
}

/// Default processor: partitions events by polarity and reports the counts.
/// Mutates nothing and calls nothing external.
pub struct CountingProcessor;

#[async_trait]
impl FeedbackProcessor for CountingProcessor {
    async fn process(&self, events: &[FeedbackEvent]) -> Result<PassReport> {
        let positive = events
            .iter()
            .filter(|e| e.polarity == Polarity::Up)
            .count();
        let negative = events.len() - positive;

        let report = PassReport { positive, negative };
        info!("Positive feedback count: {}", report.positive);
        info!("Negative feedback count: {}", report.negative);
        Ok(report)
    }
}

/// Run one processing pass: load all records and hand them to the processor
pub async fn run_pass(
    store: &dyn FeedbackStore,
    processor: &dyn FeedbackProcessor,
) -> Result<PassReport> {
    let events = store.list_all().await?;
    debug!("Processing {} feedback events", events.len());
    processor.process(&events).await
}

/// Handle to the running scheduler task. Dropping the handle without calling
/// [`SchedulerHandle::shutdown`] aborts the task.
pub struct SchedulerHandle {
    shutdown_tx: broadcast::Sender<()>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Signal the task to stop and wait for it to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        debug!("Scheduler stopped");
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Daily batch runner. Fires once per day at local midnight.
pub struct BatchScheduler {
    store: Arc<dyn FeedbackStore>,
    processor: Arc<dyn FeedbackProcessor>,
}

impl BatchScheduler {
    pub fn new(store: Arc<dyn FeedbackStore>, processor: Arc<dyn FeedbackProcessor>) -> Self {
        Self { store, processor }
    }

    /// Spawn the scheduler task and return its handle
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let store = self.store;
        let processor = self.processor;

        let handle = tokio::spawn(async move {
            loop {
                let wait = duration_until_next_pass(Local::now());
                debug!("Next feedback-processing pass in {}s", wait.as_secs());

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        info!("Processing and analyzing feedback...");
                        if let Err(e) = run_pass(store.as_ref(), processor.as_ref()).await {
                            warn!("Feedback-processing pass failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Scheduler received shutdown signal");
                        break;
                    }
                }
            }
        });

        SchedulerHandle {
            shutdown_tx,
            handle: Some(handle),
        }
    }
}

/// Time from `now` until the next local midnight
fn duration_until_next_pass(now: DateTime<Local>) -> Duration {
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return FALLBACK_WAIT;
    };
    let Some(naive_midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
        return FALLBACK_WAIT;
    };

    let next = match Local.from_local_datetime(&naive_midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return FALLBACK_WAIT,
    };

    (next - now).to_std().unwrap_or(FALLBACK_WAIT)
}
