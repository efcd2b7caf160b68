use sqlx::{Postgres, Transaction};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::{TransactionError, TransactionResult};

/// Executor wraps a live database transaction for use by repositories.
///
/// Clones share the same slot, so every repository taking part in a unit of
/// work issues its statements on the same transaction. Once the transaction
/// is finalized the slot is empty and [`Executor::acquire`] fails with
/// [`TransactionError::TransactionClosed`].
pub struct Executor<Tx = Transaction<'static, Postgres>> {
    tx: Arc<Mutex<Option<Tx>>>,
}

impl<Tx> Executor<Tx> {
    /// Creates a new Executor owning the given transaction.
    pub fn new(tx: Tx) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Creates an Executor that holds no transaction.
    pub fn detached() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Locks the slot and returns the live transaction.
    ///
    /// The guard must be dropped before the unit of work returns, otherwise
    /// finalization waits for it.
    pub async fn acquire(&self) -> TransactionResult<MappedMutexGuard<'_, Tx>> {
        let guard = self.tx.lock().await;
        MutexGuard::try_map(guard, Option::as_mut).map_err(|_| TransactionError::TransactionClosed)
    }

    /// Whether a transaction is still held.
    pub async fn is_active(&self) -> bool {
        self.tx.lock().await.is_some()
    }

    /// Takes ownership of the transaction, leaving None in its place.
    /// This should only be called when committing or rolling back.
    pub(crate) async fn take_transaction(&self) -> TransactionResult<Tx> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or(TransactionError::TransactionClosed)
    }
}

impl<Tx> Clone for Executor<Tx> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<Tx> fmt::Debug for Executor<Tx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.tx.try_lock() {
            Ok(slot) if slot.is_some() => "active",
            Ok(_) => "closed",
            Err(_) => "in use",
        };
        f.debug_struct("Executor").field("state", &state).finish()
    }
}
