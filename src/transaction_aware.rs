use async_trait::async_trait;

use crate::TransactionResult;

/// Trait for components that need to be notified of transaction lifecycle events.
///
/// Components implementing this trait can be registered with a [`TxHandle`]
/// to receive callbacks once the transaction has been committed or rolled back.
/// Failures returned from these callbacks are logged; they never change the
/// outcome reported by the transaction manager, because the fate of the
/// transaction is already decided when they run.
///
/// [`TxHandle`]: crate::TxHandle
#[async_trait]
pub trait TransactionAware: Send + Sync {
    /// Called after a successful transaction commit.
    async fn on_commit(&self) -> TransactionResult<()>;

    /// Called after a successful transaction rollback.
    ///
    /// Implementations should use this to revert any in-memory state changes
    /// that were made during the transaction.
    async fn on_rollback(&self) -> TransactionResult<()>;
}
