/// Polling engine - decides what is due, checks it and reports back
///
/// This module is responsible for:
/// - Executing HTTP checks and classifying failures
/// - Re-deriving due watches from registry state every cycle
/// - Reporting each outcome independently of the others
pub mod checker;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use checker::HttpChecker;
pub use executor::MonitoringExecutor;
pub use scheduler::{MonitoringScheduler, PollerSettings};
pub use types::WatchSnapshot;
