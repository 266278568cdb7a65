use serde::{Deserialize, Serialize};

/// Status recorded when a check never got an HTTP response
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Watch model - a registered URL and the last thing we saw there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
    pub id: i64,
    pub url: String,
    /// Seconds between checks
    pub interval: i64,
    /// Last observed HTTP status, or [`NO_RESPONSE_STATUS`]
    pub status: Option<u16>,
    /// Why the last check got no response
    pub error: Option<String>,
    pub last_checked: Option<i64>,
    pub added_at: i64,
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWatch {
    pub url: String,
    pub interval: i64,
}

/// Outcome of one check, as reported by the poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub id: i64,
    pub status: u16,
    #[serde(default)]
    pub error: Option<String>,
}

impl CheckReport {
    pub fn response(id: i64, status: u16) -> Self {
        Self { id, status, error: None }
    }

    pub fn no_response(id: i64, error: impl Into<String>) -> Self {
        Self { id, status: NO_RESPONSE_STATUS, error: Some(error.into()) }
    }
}
