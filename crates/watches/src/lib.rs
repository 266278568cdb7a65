//! Watches: URL liveness records and the registry that guards them.
//!
//! The crate owns the three pieces both Uptick binaries share:
//! - [`store`]: durable keyed watch records (libsql behind a deadpool pool)
//! - [`registry`]: validation in front of the store and result reconciliation
//! - [`clock`]: the injected notion of "now" used for timestamps

pub mod clock;
pub mod error;
pub mod models;
pub mod registry;
pub mod store;
mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StorageError, WatchError};
pub use models::{CheckReport, NO_RESPONSE_STATUS, NewWatch, Watch};
pub use registry::WatchRegistry;
pub use store::{LibsqlWatchStore, WatchStore};

pub type Result<T, E = WatchError> = std::result::Result<T, E>;
