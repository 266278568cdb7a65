use std::sync::Arc;

use tracing::{info, warn};
use watches::CheckReport;

use super::checker::{CheckFailure, Checker};

/// Monitoring executor - turns one check into the report sent back to the registry
pub struct MonitoringExecutor {
    checker: Arc<dyn Checker>,
}

impl MonitoringExecutor {
    pub fn new(checker: Arc<dyn Checker>) -> Self {
        Self { checker }
    }

    /// Check a watch; a failure to get a response becomes a sentinel report
    pub async fn execute_check(&self, id: i64, target: Option<&str>) -> CheckReport {
        let outcome = match target {
            Some(target) => {
                info!(watch_id = id, %target, "Checking watch");
                self.checker.check(target).await
            }
            None => Err(CheckFailure::Request("watch has no url".to_string())),
        };

        match outcome {
            Ok(status) => CheckReport::response(id, status),
            Err(failure) => {
                warn!(watch_id = id, "Check failed: {failure}");
                CheckReport::no_response(id, failure.to_string())
            }
        }
    }
}
