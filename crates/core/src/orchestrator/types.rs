//! Types for the batch orchestrator.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetcher::{DetailOutcome, DriverId, PenaltyOutcome};

/// Errors that can occur when starting a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    /// A run is already in progress on this orchestrator.
    #[error("a run is already in progress")]
    AlreadyRunning,
}

/// Why a run stopped before exhausting the driver list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortReason {
    /// 1-based index of the window that contained the server error.
    pub batch_index: usize,
    /// Drivers whose lookup returned 500 in that window.
    pub driver_ids: Vec<DriverId>,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.driver_ids.iter().map(DriverId::as_str).collect();
        write!(
            f,
            "server returned 500 for driver(s) {} in batch {}",
            ids.join(", "),
            self.batch_index
        )
    }
}

/// Progress notification emitted while a run advances.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The list endpoint failed; the run continues with no drivers.
    ListFetchFailed { reason: String },
    /// Driver list obtained.
    DriversDiscovered { count: usize },
    /// A window is about to be dispatched. `index` is 1-based.
    BatchStarted {
        index: usize,
        total: usize,
        driver_ids: Vec<DriverId>,
    },
    /// Every lookup in a window has returned.
    BatchCompleted {
        index: usize,
        total: usize,
        outcomes: Vec<DetailOutcome>,
    },
    /// The run stops after the current window.
    Aborted { reason: AbortReason },
    /// The run is over, by exhaustion or abort.
    Finished { report: RunReport },
}

/// Count of outcomes per class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub values: usize,
    pub missing: usize,
    pub parse_errors: usize,
    pub http_errors: usize,
    pub network_errors: usize,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Wall-clock time the run started.
    pub started_at: DateTime<Utc>,
    /// Number of driver ids the run was given.
    pub discovered: usize,
    pub total_batches: usize,
    pub batches_completed: usize,
    /// One outcome per dispatched driver id, in list order.
    pub outcomes: Vec<DetailOutcome>,
    pub abort: Option<AbortReason>,
    /// Set when the list endpoint failed.
    pub list_error: Option<String>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn aborted(&self) -> bool {
        self.abort.is_some()
    }

    pub fn summary(&self) -> OutcomeSummary {
        self.outcomes
            .iter()
            .fold(OutcomeSummary::default(), |mut acc, outcome| {
                match outcome.penalty {
                    PenaltyOutcome::Value(_) => acc.values += 1,
                    PenaltyOutcome::Missing => acc.missing += 1,
                    PenaltyOutcome::ParseError => acc.parse_errors += 1,
                    PenaltyOutcome::HttpError(_) => acc.http_errors += 1,
                    PenaltyOutcome::NetworkError(_) => acc.network_errors += 1,
                }
                acc
            })
    }
}
