use libsql::Connection;

use crate::error::StorageError;

/// Schema version - increment when making schema changes
const SCHEMA_VERSION: i32 = 1;

/// Bring the schema up to [`SCHEMA_VERSION`]
pub async fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL,
            description TEXT
        )",
        (),
    )
    .await?;

    let current_version = get_current_version(conn).await?;

    if current_version >= SCHEMA_VERSION {
        tracing::debug!("Database schema is up to date (version {})", current_version);
        return Ok(());
    }

    tracing::info!("Running migrations from version {} to {}", current_version, SCHEMA_VERSION);

    if current_version < 1 {
        run_migration_v1(conn).await?;
        record_migration(conn, 1, "Create watches table").await?;
    }

    Ok(())
}

async fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let mut rows = conn.query("SELECT MAX(version) FROM schema_migrations", ()).await?;

    if let Some(row) = rows.next().await? {
        let version: Option<i32> = row.get(0)?;
        Ok(version.unwrap_or(0))
    } else {
        Ok(0)
    }
}

async fn record_migration(
    conn: &Connection,
    version: i32,
    description: &str,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?, ?, ?)",
        libsql::params![version, chrono::Utc::now().timestamp(), description],
    )
    .await?;

    tracing::info!("Applied migration v{}: {}", version, description);
    Ok(())
}

/// Migration v1: one row per watch, latest result stored inline
async fn run_migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // AUTOINCREMENT so ids of the highest rows are never handed out twice
    conn.execute(
        "CREATE TABLE IF NOT EXISTS watches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            interval INTEGER NOT NULL CHECK (interval > 0),
            status INTEGER,
            error TEXT,
            last_checked INTEGER,
            added_at INTEGER NOT NULL
        )",
        (),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempdir().unwrap();
        let db = libsql::Builder::new_local(dir.path().join("m.db")).build().await.unwrap();
        let conn = db.connect().unwrap();

        run_migrations(&conn).await.unwrap();
        run_migrations(&conn).await.unwrap();

        assert_eq!(get_current_version(&conn).await.unwrap(), SCHEMA_VERSION);

        let mut rows = conn.query("SELECT COUNT(*) FROM schema_migrations", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
