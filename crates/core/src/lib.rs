pub mod client;
pub mod config;
pub mod fetcher;
pub mod orchestrator;
pub mod report;
pub mod testing;

pub use client::{ApiClient, ApiResponse, HttpApiClient, TransportError};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, ApiConfig,
    BatchConfig, Config, ConfigError, OutputConfig, OutputFormat,
};
pub use fetcher::{DetailFetcher, DetailOutcome, DriverId, ListFetchError, PenaltyOutcome};
pub use orchestrator::{
    AbortReason, BatchOrchestrator, OrchestratorError, OutcomeSummary, RunEvent, RunObserver,
    RunReport,
};
pub use report::{format_elapsed, render_json, render_table};
