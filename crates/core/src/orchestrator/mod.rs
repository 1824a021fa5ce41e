//! Batch orchestrator for driver detail runs.
//!
//! A run walks the driver list in fixed-size windows:
//! - **Windows**: strictly sequential, separated by a fixed pause
//! - **Lookups**: concurrent within a window, bounded by the worker pool size
//! - **Abort**: a 500 anywhere in a window stops the run once that window completes

mod batching;
mod runner;
mod types;

pub use batching::{batch_count, partition};
pub use runner::{BatchOrchestrator, RunObserver};
pub use types::{AbortReason, OrchestratorError, OutcomeSummary, RunEvent, RunReport};
