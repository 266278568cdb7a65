use serde::Deserialize;
use watches::{CheckReport, Watch};

/// A watch as the poller sees it on the wire
///
/// Every field is optional: a record the registry hands back half-filled
/// is skipped or treated as never due instead of failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchSnapshot {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub interval: Option<i64>,
    pub last_checked: Option<i64>,
    pub added_at: Option<i64>,
}

impl WatchSnapshot {
    /// Ids are assigned from 1, anything else cannot be reported against
    pub fn valid_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }
}

impl From<Watch> for WatchSnapshot {
    fn from(watch: Watch) -> Self {
        Self {
            id: Some(watch.id),
            url: Some(watch.url),
            interval: Some(watch.interval),
            last_checked: watch.last_checked,
            added_at: Some(watch.added_at),
        }
    }
}

/// What happened to one due watch during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    Reported(CheckReport),
    ReportFailed { id: i64, error: String },
}

/// Summary of one polling cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Time the cycle evaluated due-ness against
    pub now: i64,
    pub listed: usize,
    /// Records without a usable id
    pub invalid: usize,
    /// Valid records that were not due
    pub not_due: usize,
    pub outcomes: Vec<WatchOutcome>,
}

impl CycleReport {
    pub fn checked(&self) -> usize {
        self.outcomes.len()
    }

    pub fn report_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, WatchOutcome::ReportFailed { .. })).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snapshots: Vec<WatchSnapshot> = serde_json::from_str(
            r#"[{"id": 1, "url": "http://x", "interval": 5, "added_at": 100, "status": 200},
                {"url": "http://no-id"},
                {"id": 0, "interval": null}]"#,
        )
        .unwrap();

        assert_eq!(snapshots[0].valid_id(), Some(1));
        assert_eq!(snapshots[0].interval, Some(5));
        assert_eq!(snapshots[0].last_checked, None);
        assert_eq!(snapshots[1].valid_id(), None);
        assert_eq!(snapshots[2].valid_id(), None);
        assert_eq!(snapshots[2].interval, None);
    }
}
