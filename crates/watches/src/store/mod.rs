/// Watch store abstraction
///
/// Durable keyed watch records. The only shared mutable resource in the
/// system: every mutation goes through [`WatchStore::update_result`], which
/// replaces status, error and last-checked together.
pub mod migrations;
pub mod pool;
mod sqlite;

pub use pool::{LibsqlManager, LibsqlPool};
pub use sqlite::LibsqlWatchStore;

use async_trait::async_trait;

use crate::Result;
use crate::models::Watch;

#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Persist a new watch and return its freshly assigned id
    async fn create(&self, url: &str, interval: i64, added_at: i64) -> Result<i64>;

    /// All watches in insertion order
    async fn list_all(&self) -> Result<Vec<Watch>>;

    /// Fails with [`WatchError::NotFound`](crate::WatchError::NotFound) if absent
    async fn get_by_id(&self, id: i64) -> Result<Watch>;

    /// Atomically overwrite the latest check result of a watch
    async fn update_result(
        &self,
        id: i64,
        status: u16,
        error: Option<String>,
        checked_at: i64,
    ) -> Result<()>;
}
