//! Mock API client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::client::{ApiClient, ApiResponse, TransportError};
use crate::config::ApiConfig;

use super::fixtures;

/// A recorded request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path as passed to `ApiClient::get`.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// When the request was made.
    pub timestamp: Instant,
}

type ScriptedReply = Result<ApiResponse, TransportError>;

/// Mock implementation of the `ApiClient` trait.
///
/// Provides controllable behavior for testing:
/// - Scripted responses per path (unscripted paths answer 404)
/// - Simulated transport failures
/// - Artificial latency, with tracking of peak concurrency
/// - Recording of every request for assertions
#[derive(Clone)]
pub struct MockApiClient {
    replies: Arc<RwLock<HashMap<String, ScriptedReply>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    delay: Arc<RwLock<Duration>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    list_path: String,
    details_path: String,
}

impl std::fmt::Debug for MockApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockApiClient")
            .field("replies", &"<replies>")
            .field("requests", &"<requests>")
            .field("list_path", &self.list_path)
            .field("details_path", &self.details_path)
            .finish()
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApiClient {
    /// Create a mock using the default endpoint paths.
    pub fn new() -> Self {
        Self::with_paths(&ApiConfig::default())
    }

    /// Create a mock whose helpers target the paths in `config`.
    pub fn with_paths(config: &ApiConfig) -> Self {
        Self {
            replies: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            list_path: config.list_path.clone(),
            details_path: config.details_path.trim_end_matches('/').to_string(),
        }
    }

    /// Script the response for an exact path.
    pub async fn respond(&self, path: &str, response: ApiResponse) {
        self.replies
            .write()
            .await
            .insert(path.to_string(), Ok(response));
    }

    /// Script a transport failure for an exact path.
    pub async fn fail(&self, path: &str, error: TransportError) {
        self.replies
            .write()
            .await
            .insert(path.to_string(), Err(error));
    }

    /// Script a successful list response.
    pub async fn set_driver_list(&self, ids: &[&str]) {
        let path = self.list_path.clone();
        self.respond(&path, ApiResponse::new(200, fixtures::driver_list_body(ids)))
            .await;
    }

    /// Script a successful detail response for `driver_id`.
    pub async fn set_penalty(&self, driver_id: &str, value: &str) {
        let path = self.detail_path(driver_id);
        self.respond(&path, ApiResponse::new(200, fixtures::penalty_body(value)))
            .await;
    }

    /// Script a bare status code for `driver_id`'s detail lookup.
    pub async fn respond_status(&self, driver_id: &str, status: u16) {
        let path = self.detail_path(driver_id);
        self.respond(&path, ApiResponse::new(status, "")).await;
    }

    /// Delay every response by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Get all recorded requests, in the order they were made.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Driver ids whose details were requested, in request order.
    pub async fn requested_driver_ids(&self) -> Vec<String> {
        let prefix = format!("{}/", self.details_path);
        self.requests
            .read()
            .await
            .iter()
            .filter_map(|r| r.path.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Number of detail-endpoint requests made so far.
    pub async fn detail_request_count(&self) -> usize {
        self.requested_driver_ids().await.len()
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn detail_path(&self, driver_id: &str) -> String {
        format!("{}/{}", self.details_path, urlencoding::encode(driver_id))
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        self.requests.write().await.push(RecordedRequest {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timestamp: Instant::now(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_else(|| Ok(ApiResponse::new(404, "")));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}
