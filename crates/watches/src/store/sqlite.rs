use std::path::Path;

use async_trait::async_trait;
use libsql::{Row, params};

use super::WatchStore;
use super::migrations::run_migrations;
use super::pool::{LibsqlManager, LibsqlPool, open_pool};
use crate::Result;
use crate::error::{StorageError, WatchError};
use crate::models::Watch;

const SELECT_WATCH: &str =
    "SELECT id, url, interval, status, error, last_checked, added_at FROM watches";

/// LibSQL watch store
pub struct LibsqlWatchStore {
    pool: LibsqlPool,
}

impl LibsqlWatchStore {
    /// Create a store over an already migrated pool
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Open the database file at `path`, creating and migrating it as needed
    pub async fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let pool = open_pool(path, pool_size).await?;

        {
            let conn = pool.get().await?;
            // Readers keep going while the poller writes results
            conn.query("PRAGMA journal_mode = WAL", ()).await?.next().await?;
            run_migrations(&conn).await?;
        }

        tracing::info!("Opened watch store at {}", path.display());
        Ok(Self::new_from_pool(pool))
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

fn watch_from_row(row: &Row) -> Result<Watch> {
    let status = row
        .get::<Option<i64>>(3)?
        .map(|code| {
            u16::try_from(code)
                .map_err(|_| StorageError::Corrupt(format!("status {code} is not an HTTP status")))
        })
        .transpose()?;

    Ok(Watch {
        id: row.get(0)?,
        url: row.get(1)?,
        interval: row.get(2)?,
        status,
        error: row.get(4)?,
        last_checked: row.get(5)?,
        added_at: row.get(6)?,
    })
}

#[async_trait]
impl WatchStore for LibsqlWatchStore {
    async fn create(&self, url: &str, interval: i64, added_at: i64) -> Result<i64> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO watches (url, interval, added_at) VALUES (?, ?, ?)",
            params![url.to_string(), interval, added_at],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }

    async fn list_all(&self) -> Result<Vec<Watch>> {
        let conn = self.get_conn().await?;
        let mut rows = conn.query(&format!("{SELECT_WATCH} ORDER BY id"), ()).await?;

        let mut watches = Vec::new();
        while let Some(row) = rows.next().await? {
            watches.push(watch_from_row(&row)?);
        }

        Ok(watches)
    }

    async fn get_by_id(&self, id: i64) -> Result<Watch> {
        let conn = self.get_conn().await?;
        let mut rows = conn.query(&format!("{SELECT_WATCH} WHERE id = ?"), params![id]).await?;

        match rows.next().await? {
            Some(row) => watch_from_row(&row),
            None => Err(WatchError::NotFound(id)),
        }
    }

    async fn update_result(
        &self,
        id: i64,
        status: u16,
        error: Option<String>,
        checked_at: i64,
    ) -> Result<()> {
        let conn = self.get_conn().await?;

        // One statement, so a reader sees either the old triple or the new one
        let updated = conn
            .execute(
                "UPDATE watches SET status = ?, error = ?, last_checked = ? WHERE id = ?",
                params![i64::from(status), error, checked_at, id],
            )
            .await?;

        if updated == 0 {
            return Err(WatchError::NotFound(id));
        }
        Ok(())
    }
}
