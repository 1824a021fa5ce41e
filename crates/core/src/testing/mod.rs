//! Testing utilities and mock implementations.
//!
//! This module provides a scripted `ApiClient`, allowing orchestrator runs
//! to be exercised without a real driver API.
//!
//! # Example
//!
//! ```rust,ignore
//! use driverfetch_core::testing::MockApiClient;
//!
//! let client = MockApiClient::new();
//! client.set_driver_list(&["d1", "d2"]).await;
//! client.set_penalty("d1", "10").await;
//! client.respond_status("d2", 500).await;
//!
//! // Run the orchestrator, then inspect what was requested
//! assert_eq!(client.detail_request_count().await, 2);
//! ```

mod mock_client;

pub use mock_client::{MockApiClient, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::{ApiConfig, BatchConfig, Config};
    use crate::fetcher::DriverId;

    /// Build `count` driver ids named `d1..=dN`.
    pub fn driver_ids(count: usize) -> Vec<DriverId> {
        (1..=count).map(|i| DriverId::new(format!("d{}", i))).collect()
    }

    /// Config with the default API paths and the given batching parameters.
    pub fn config(window_size: usize, worker_pool_size: usize, pause_ms: u64) -> Config {
        Config {
            api: ApiConfig::default(),
            batch: BatchConfig {
                window_size,
                worker_pool_size,
                pause_ms,
            },
            ..Default::default()
        }
    }

    /// JSON body of a successful detail response.
    pub fn penalty_body(value: &str) -> String {
        serde_json::json!({ "data": { "totalPenaltyApplicable": value } }).to_string()
    }

    /// JSON body of a successful list response.
    pub fn driver_list_body(ids: &[&str]) -> String {
        serde_json::json!({ "data": ids }).to_string()
    }
}
