use thiserror::Error;

/// Failures surfaced by the store and the registry
#[derive(Debug, Error)]
pub enum WatchError {
    /// Malformed create request, never persisted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("watch {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The persistence medium could not serve the request
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool::managed::PoolError<libsql::Error>),

    #[error("connection pool could not be built: {0}")]
    PoolBuild(String),

    /// A stored row did not have the shape we expect
    #[error("corrupt watch row: {0}")]
    Corrupt(String),
}

impl From<libsql::Error> for WatchError {
    fn from(error: libsql::Error) -> Self {
        Self::Storage(StorageError::Database(error))
    }
}

impl From<deadpool::managed::PoolError<libsql::Error>> for WatchError {
    fn from(error: deadpool::managed::PoolError<libsql::Error>) -> Self {
        Self::Storage(StorageError::Pool(error))
    }
}

impl WatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
