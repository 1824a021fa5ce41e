//! Driver list and per-driver detail lookups.
//!
//! `DetailFetcher` never fails: every distinguishable outcome of a detail
//! lookup is folded into a `PenaltyOutcome` so the orchestrator can treat
//! results uniformly and only branch on `PenaltyOutcome::is_abort_signal`.

mod detail;
mod types;

pub use detail::DetailFetcher;
pub use types::*;
