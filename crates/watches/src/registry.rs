//! Watch registry - the boundary in front of the store.
//!
//! Create requests are validated here before anything is persisted, and
//! reported check results are reconciled into the stored record. Time comes
//! from the injected [`Clock`] so none of this depends on the wall clock.

use std::sync::Arc;

use crate::Result;
use crate::clock::Clock;
use crate::models::{CheckReport, NO_RESPONSE_STATUS, Watch};
use crate::store::WatchStore;
use crate::validation::{validate_interval, validate_url};

/// Error text stored for a no-response report that arrived without one
const UNDESCRIBED_FAILURE: &str = "no response";

pub struct WatchRegistry {
    store: Arc<dyn WatchStore>,
    clock: Arc<dyn Clock>,
}

impl WatchRegistry {
    pub fn new(store: Arc<dyn WatchStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a new watch, stamped with the current time
    pub async fn add_watch(&self, url: &str, interval: i64) -> Result<Watch> {
        let url = validate_url(url)?;
        let interval = validate_interval(interval)?;
        let added_at = self.clock.now();

        let id = self.store.create(&url, interval, added_at).await?;
        tracing::info!(watch_id = id, %url, interval, "Watch added");

        Ok(Watch { id, url, interval, status: None, error: None, last_checked: None, added_at })
    }

    pub async fn list_watches(&self) -> Result<Vec<Watch>> {
        self.store.list_all().await
    }

    pub async fn get_watch(&self, id: i64) -> Result<Watch> {
        self.store.get_by_id(id).await
    }

    /// Apply a check outcome to the watch, replacing whatever was there
    ///
    /// Any holder of a valid id may report; `checked_at` is taken from the
    /// clock at the moment the report arrives.
    pub async fn report_result(&self, id: i64, status: u16, error: Option<String>) -> Result<()> {
        let error = reconcile_error(status, error);
        let checked_at = self.clock.now();

        self.store.update_result(id, status, error, checked_at).await?;
        tracing::debug!(watch_id = id, status, checked_at, "Result reconciled");
        Ok(())
    }

    pub async fn apply_report(&self, report: CheckReport) -> Result<()> {
        self.report_result(report.id, report.status, report.error).await
    }
}

/// The error column is set exactly when no response was obtained
fn reconcile_error(status: u16, error: Option<String>) -> Option<String> {
    let error = error.filter(|e| !e.trim().is_empty());

    if status == NO_RESPONSE_STATUS {
        Some(error.unwrap_or_else(|| UNDESCRIBED_FAILURE.to_string()))
    } else {
        if let Some(error) = error {
            tracing::debug!(status, %error, "Dropping error text reported alongside an HTTP status");
        }
        None
    }
}
