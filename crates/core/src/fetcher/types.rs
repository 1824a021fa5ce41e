//! Types produced by the fetchers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::client::TransportError;

/// Status code that aborts a run when returned by the detail endpoint.
pub const ABORT_STATUS: u16 = 500;

/// Opaque driver identifier as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DriverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Classification of a single detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PenaltyOutcome {
    /// `data.totalPenaltyApplicable` as reported by the API.
    Value(String),
    /// 200 response without a penalty field.
    Missing,
    /// 200 response whose body could not be interpreted.
    ParseError,
    /// Any non-200 status.
    HttpError(u16),
    /// No response at all (timeout, refused connection, DNS).
    NetworkError(String),
}

impl PenaltyOutcome {
    /// Only a 500 from the detail endpoint halts the run.
    pub fn is_abort_signal(&self) -> bool {
        matches!(self, PenaltyOutcome::HttpError(ABORT_STATUS))
    }

    /// Short machine-friendly class name, stable across values.
    pub fn class(&self) -> &'static str {
        match self {
            PenaltyOutcome::Value(_) => "value",
            PenaltyOutcome::Missing => "missing",
            PenaltyOutcome::ParseError => "parse_error",
            PenaltyOutcome::HttpError(_) => "http_error",
            PenaltyOutcome::NetworkError(_) => "network_error",
        }
    }
}

impl fmt::Display for PenaltyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyOutcome::Value(v) => f.write_str(v),
            PenaltyOutcome::Missing => f.write_str("N/A"),
            PenaltyOutcome::ParseError => f.write_str("Error Parsing"),
            PenaltyOutcome::HttpError(code) => write!(f, "API Error {}", code),
            PenaltyOutcome::NetworkError(_) => f.write_str("Network Error"),
        }
    }
}

/// Result of looking up one driver. Exactly one is produced per requested id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailOutcome {
    pub driver_id: DriverId,
    pub penalty: PenaltyOutcome,
}

impl DetailOutcome {
    pub fn new(driver_id: DriverId, penalty: PenaltyOutcome) -> Self {
        Self { driver_id, penalty }
    }

    /// The penalty column as displayed: the value or its sentinel string.
    pub fn penalty_value(&self) -> String {
        self.penalty.to_string()
    }

    pub fn is_abort_signal(&self) -> bool {
        self.penalty.is_abort_signal()
    }
}

/// Why the driver list could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListFetchError {
    #[error("Failed to fetch driver list. API Error {0}")]
    Status(u16),

    #[error("Error parsing driver list: {0}")]
    Parse(String),

    #[error("Failed to fetch driver list: {0}")]
    Transport(#[from] TransportError),
}
