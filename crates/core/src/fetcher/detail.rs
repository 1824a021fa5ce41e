//! Detail and list lookups against the driver API.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{ApiClient, ApiResponse};
use crate::config::ApiConfig;

use super::{DetailOutcome, DriverId, ListFetchError, PenaltyOutcome};

/// Field inside `data` carrying the penalty.
const PENALTY_FIELD: &str = "totalPenaltyApplicable";

/// Performs one request per call against the list and detail endpoints.
#[derive(Clone)]
pub struct DetailFetcher {
    client: Arc<dyn ApiClient>,
    list_path: String,
    details_path: String,
    partner_id: String,
}

impl std::fmt::Debug for DetailFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailFetcher")
            .field("client", &"<client>")
            .field("list_path", &self.list_path)
            .field("details_path", &self.details_path)
            .field("partner_id", &self.partner_id)
            .finish()
    }
}

impl DetailFetcher {
    pub fn new(client: Arc<dyn ApiClient>, config: &ApiConfig) -> Self {
        Self {
            client,
            list_path: config.list_path.clone(),
            details_path: config.details_path.clone(),
            partner_id: config.partner_id.clone(),
        }
    }

    /// Fetch the full list of driver ids.
    ///
    /// A 200 body must look like `{ "data": [id, ...] }`. A missing or null
    /// `data` field yields an empty list.
    pub async fn fetch_driver_list(&self) -> Result<Vec<DriverId>, ListFetchError> {
        debug!(path = %self.list_path, "Fetching driver list");

        let response = self.client.get(&self.list_path, &[]).await?;
        if !response.is_ok() {
            warn!(status = response.status, "Driver list request failed");
            return Err(ListFetchError::Status(response.status));
        }

        parse_driver_list(&response.body)
    }

    /// Look up one driver. Never fails; every failure becomes a sentinel.
    pub async fn fetch_detail(&self, driver_id: &DriverId) -> DetailOutcome {
        let path = format!(
            "{}/{}",
            self.details_path.trim_end_matches('/'),
            urlencoding::encode(driver_id.as_str())
        );
        debug!(driver_id = %driver_id, "Fetching driver details");

        let penalty = match self
            .client
            .get(&path, &[("partnerId", self.partner_id.as_str())])
            .await
        {
            Ok(response) => classify_detail_response(driver_id, &response),
            Err(e) => {
                warn!(driver_id = %driver_id, error = %e, "Driver details request failed");
                PenaltyOutcome::NetworkError(e.to_string())
            }
        };

        DetailOutcome::new(driver_id.clone(), penalty)
    }
}

fn classify_detail_response(driver_id: &DriverId, response: &ApiResponse) -> PenaltyOutcome {
    if !response.is_ok() {
        warn!(
            driver_id = %driver_id,
            status = response.status,
            "Driver details returned error status"
        );
        return PenaltyOutcome::HttpError(response.status);
    }

    match parse_penalty(&response.body) {
        Some(outcome) => outcome,
        None => {
            debug!(driver_id = %driver_id, "Could not parse driver details body");
            PenaltyOutcome::ParseError
        }
    }
}

/// Extract `data.totalPenaltyApplicable`. `None` means the body is unusable.
fn parse_penalty(body: &str) -> Option<PenaltyOutcome> {
    let root: Value = serde_json::from_str(body).ok()?;
    let root = root.as_object()?;

    let data = match root.get("data") {
        None => return Some(PenaltyOutcome::Missing),
        Some(data) => data.as_object()?,
    };

    let outcome = match data.get(PENALTY_FIELD) {
        None | Some(Value::Null) => PenaltyOutcome::Missing,
        Some(Value::String(s)) => PenaltyOutcome::Value(s.clone()),
        Some(other) => PenaltyOutcome::Value(other.to_string()),
    };
    Some(outcome)
}

fn parse_driver_list(body: &str) -> Result<Vec<DriverId>, ListFetchError> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| ListFetchError::Parse(e.to_string()))?;
    let root = root
        .as_object()
        .ok_or_else(|| ListFetchError::Parse("response is not a JSON object".to_string()))?;

    let items = match root.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ListFetchError::Parse(
                "'data' is not an array".to_string(),
            ))
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(DriverId::new(s.clone())),
            Value::Number(n) => Ok(DriverId::new(n.to_string())),
            other => Err(ListFetchError::Parse(format!(
                "unsupported driver id: {}",
                other
            ))),
        })
        .collect()
}
