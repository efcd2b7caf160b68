/// Failure reported by the driver while beginning or finalizing a transaction.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("operation cancelled by caller")]
    Cancelled,
}

/// Error type for transaction-managed operations
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Transaction begin failed: {0}")]
    BeginFailed(#[source] DriverError),

    #[error("Transaction commit failed: {0}")]
    CommitFailed(#[source] DriverError),

    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(#[source] DriverError),

    #[error("Transaction already finalized")]
    TransactionClosed,

    #[error("Unit of work aborted: {0}")]
    Aborted(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl TransactionError {
    /// Shorthand for a business-logic failure raised inside a unit of work.
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted(reason.into())
    }

    pub fn is_begin_failure(&self) -> bool {
        matches!(self, Self::BeginFailed(_))
    }

    pub fn is_commit_failure(&self) -> bool {
        matches!(self, Self::CommitFailed(_))
    }

    /// True when the error was caused by the caller's cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::BeginFailed(DriverError::Cancelled)
                | Self::CommitFailed(DriverError::Cancelled)
                | Self::RollbackFailed(DriverError::Cancelled)
        )
    }
}

/// Result type for transaction-managed operations
pub type TransactionResult<T> = Result<T, TransactionError>;
