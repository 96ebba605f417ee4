use thiserror::Error as ThisError;

/// Failure reported by the storage gateway.
///
/// Persistence errors travel to the caller unmodified; the service layer never
/// wraps, retries or swallows them.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("storage task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// True when the failure means "no such row".
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Query(diesel::result::Error::NotFound))
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown set field `{0}` (expected weight, reps, rir or percentage)")]
    UnknownField(String),
}
