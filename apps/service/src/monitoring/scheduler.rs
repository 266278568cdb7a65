use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use watches::Clock;

use super::executor::MonitoringExecutor;
use super::types::{CycleReport, WatchOutcome, WatchSnapshot};
use crate::client::{ClientError, RegistryClient};

/// Knobs for the polling loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSettings {
    /// Sleep between cycles, and the retry delay after a failed listing
    pub poll_interval: Duration,
    /// Checks in flight at once within a cycle
    pub max_concurrent_checks: usize,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(2), max_concurrent_checks: 1 }
    }
}

/// Whether `watch` should be checked at `now`
///
/// Measured from the last check, or from creation if it was never checked.
/// A missing or non-positive interval is never due.
pub fn is_due(watch: &WatchSnapshot, now: i64) -> bool {
    let Some(interval) = watch.interval.filter(|interval| *interval > 0) else {
        return false;
    };
    let reference = watch.last_checked.or(watch.added_at).unwrap_or(0);

    now.saturating_sub(reference) >= interval
}

/// Monitoring scheduler - re-derives what is due from the registry every cycle
///
/// Keeps no schedule of its own: the registry's timestamps are the only
/// record of when a watch was last checked, so restarts lose nothing.
pub struct MonitoringScheduler {
    registry: Arc<dyn RegistryClient>,
    executor: MonitoringExecutor,
    clock: Arc<dyn Clock>,
    settings: PollerSettings,
}

impl MonitoringScheduler {
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        executor: MonitoringExecutor,
        clock: Arc<dyn Clock>,
        settings: PollerSettings,
    ) -> Self {
        Self { registry, executor, clock, settings }
    }

    /// One pass: list, filter due, check and report each
    ///
    /// Only a failed listing fails the cycle. Check and report failures stay
    /// inside the outcome of the watch they belong to.
    pub async fn run_cycle(&self) -> Result<CycleReport, ClientError> {
        let now = self.clock.now();
        let watches = self.registry.list_watches().await?;

        let mut report = CycleReport { now, listed: watches.len(), ..CycleReport::default() };
        let mut due = Vec::new();
        for watch in watches {
            match watch.valid_id() {
                None => report.invalid += 1,
                Some(_) if !is_due(&watch, now) => report.not_due += 1,
                Some(id) => due.push((id, watch.url)),
            }
        }

        report.outcomes = stream::iter(due)
            .map(|(id, url)| async move { self.process(id, url.as_deref()).await })
            .buffer_unordered(self.settings.max_concurrent_checks.max(1))
            .collect()
            .await;

        Ok(report)
    }

    async fn process(&self, id: i64, url: Option<&str>) -> WatchOutcome {
        let report = self.executor.execute_check(id, url).await;

        match self.registry.report_result(&report).await {
            Ok(()) => WatchOutcome::Reported(report),
            Err(e) => {
                error!(watch_id = id, "Failed to report check result: {e}");
                WatchOutcome::ReportFailed { id, error: e.to_string() }
            }
        }
    }

    /// Poll until `shutdown` flips to true
    ///
    /// Shutdown is only looked at between cycles, so a cycle in progress
    /// always runs to completion.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Poller started (every {:?}, up to {} concurrent checks)",
            self.settings.poll_interval, self.settings.max_concurrent_checks
        );

        while !*shutdown.borrow() {
            match self.run_cycle().await {
                Ok(report) => debug!(
                    now = report.now,
                    listed = report.listed,
                    checked = report.checked(),
                    report_failures = report.report_failures(),
                    "Cycle complete"
                ),
                Err(e) => warn!("Failed to load watches, retrying in {:?}: {e}", self.settings.poll_interval),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Poller stopped");
    }
}
