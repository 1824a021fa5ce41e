//! Batch orchestrator implementation.
//!
//! One task drives the window loop. Lookups within a window run as
//! concurrent futures joined at the window boundary, so outcomes are only
//! ever merged by the driving task and no shared state needs locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::BatchConfig;
use crate::fetcher::{DetailFetcher, DetailOutcome, DriverId};

use super::batching::{batch_count, partition};
use super::types::{AbortReason, OrchestratorError, RunEvent, RunReport};

/// Callback invoked for every `RunEvent`.
pub type RunObserver = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Transient state of one invocation, owned by the driving task.
struct RunState {
    started: Instant,
    started_at: DateTime<Utc>,
    outcomes: Vec<DetailOutcome>,
    abort: Option<AbortReason>,
    batches_completed: usize,
}

impl RunState {
    fn new(started: Instant, started_at: DateTime<Utc>) -> Self {
        Self {
            started,
            started_at,
            outcomes: Vec::new(),
            abort: None,
            batches_completed: 0,
        }
    }

    fn finish(
        self,
        discovered: usize,
        total_batches: usize,
        list_error: Option<String>,
    ) -> RunReport {
        RunReport {
            started_at: self.started_at,
            discovered,
            total_batches,
            batches_completed: self.batches_completed,
            outcomes: self.outcomes,
            abort: self.abort,
            list_error,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Clears the running flag when a triggered run ends, however it ends.
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Option<Self> {
        if running.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self { running })
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Drives driver lookups window by window, stopping on a server error.
pub struct BatchOrchestrator {
    fetcher: DetailFetcher,
    config: BatchConfig,
    observer: Option<RunObserver>,
    running: AtomicBool,
}

impl BatchOrchestrator {
    pub fn new(fetcher: DetailFetcher, config: BatchConfig) -> Self {
        Self {
            fetcher,
            config,
            observer: None,
            running: AtomicBool::new(false),
        }
    }

    /// Register a callback that receives every progress event.
    pub fn with_observer(mut self, observer: RunObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Whether a triggered run is currently in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start a full run: fetch the driver list, then process it.
    ///
    /// A list failure is reported on the returned `RunReport` and the run
    /// completes with no drivers. Returns `AlreadyRunning` if another
    /// triggered run has not finished yet.
    pub async fn trigger(&self) -> Result<RunReport, OrchestratorError> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            warn!("Run requested while another run is in progress");
            return Err(OrchestratorError::AlreadyRunning);
        };

        let started = Instant::now();
        let started_at = Utc::now();

        info!("Fetching list of drivers");
        let (driver_ids, list_error) = match self.fetcher.fetch_driver_list().await {
            Ok(ids) => (ids, None),
            Err(e) => {
                error!(error = %e, "Driver list unavailable, continuing with no drivers");
                self.emit(&RunEvent::ListFetchFailed {
                    reason: e.to_string(),
                });
                (Vec::new(), Some(e.to_string()))
            }
        };

        info!(count = driver_ids.len(), "Total drivers found");
        self.emit(&RunEvent::DriversDiscovered {
            count: driver_ids.len(),
        });

        let state = RunState::new(started, started_at);
        Ok(self.execute(driver_ids, state, list_error).await)
    }

    /// Process an already-known list of driver ids.
    pub async fn run_all(&self, driver_ids: Vec<DriverId>) -> RunReport {
        let state = RunState::new(Instant::now(), Utc::now());
        self.execute(driver_ids, state, None).await
    }

    async fn execute(
        &self,
        driver_ids: Vec<DriverId>,
        mut state: RunState,
        list_error: Option<String>,
    ) -> RunReport {
        let window_size = self.config.window_size.max(1);
        let total = batch_count(driver_ids.len(), window_size);
        let pause = self.config.pause();

        for (i, window) in partition(&driver_ids, window_size).enumerate() {
            let index = i + 1;
            let ids: Vec<&str> = window.iter().map(DriverId::as_str).collect();
            info!(batch = index, total, driver_ids = ?ids, "Fetching details for batch");
            self.emit(&RunEvent::BatchStarted {
                index,
                total,
                driver_ids: window.to_vec(),
            });

            let outcomes = self.fetch_window(window).await;

            let triggering: Vec<DriverId> = outcomes
                .iter()
                .filter(|o| o.is_abort_signal())
                .map(|o| o.driver_id.clone())
                .collect();

            self.emit(&RunEvent::BatchCompleted {
                index,
                total,
                outcomes: outcomes.clone(),
            });
            state.outcomes.extend(outcomes);
            state.batches_completed += 1;

            if !triggering.is_empty() {
                let reason = AbortReason {
                    batch_index: index,
                    driver_ids: triggering,
                };
                error!(reason = %reason, "Aborting due to 500 error in this batch");
                self.emit(&RunEvent::Aborted {
                    reason: reason.clone(),
                });
                state.abort = Some(reason);
                break;
            }

            if index < total && !pause.is_zero() {
                debug!(pause_ms = self.config.pause_ms, "Pausing before next batch");
                tokio::time::sleep(pause).await;
            }
        }

        let report = state.finish(driver_ids.len(), total, list_error);
        info!(
            rows = report.outcomes.len(),
            batches = report.batches_completed,
            aborted = report.aborted(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Run finished"
        );
        self.emit(&RunEvent::Finished {
            report: report.clone(),
        });
        report
    }

    /// Look up every id in `window`, at most `worker_pool_size` at a time.
    /// Returns only once all lookups are done, in window order.
    async fn fetch_window(&self, window: &[DriverId]) -> Vec<DetailOutcome> {
        stream::iter(window)
            .map(|id| self.fetcher.fetch_detail(id))
            .buffered(self.config.worker_pool_size.max(1))
            .collect()
            .await
    }

    fn emit(&self, event: &RunEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}
