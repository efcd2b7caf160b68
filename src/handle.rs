use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    Database, DatabaseTransaction, DriverError, Executor, NullTransactionManager, ResourceProvider,
    SqlTransactionManager, TransactionAware, TransactionError, TransactionManager,
    TransactionResult, TxContext, TxLogger, TxOptions, TxOutcome,
};

/// One open transaction, handed to the unit of work by a transaction manager.
///
/// Clones share the underlying transaction. A handle is scoped to the
/// `exec_tx` call that created it; once that call finalizes the transaction,
/// every clone's executor reports [`TransactionError::TransactionClosed`].
pub struct TxHandle<D: Database> {
    id: Uuid,
    executor: Executor<D::Transaction>,
    options: TxOptions,
    logger: TxLogger,
    observers: Arc<RwLock<Vec<Arc<dyn TransactionAware>>>>,
    detached: bool,
}

impl<D: Database> TxHandle<D> {
    /// Begin a transaction on `database`. Nothing needs finalizing if this fails.
    pub(crate) async fn begin(
        ctx: &TxContext,
        database: &D,
        options: TxOptions,
        logger: TxLogger,
    ) -> TransactionResult<Self> {
        let begun = match ctx.run_until_cancelled(database.begin_transaction(&options)).await {
            Some(result) => result.map_err(DriverError::Database),
            None => Err(DriverError::Cancelled),
        };
        let tx = match begun {
            Ok(tx) => tx,
            Err(cause) => {
                let err = TransactionError::BeginFailed(cause);
                logger.begin_failed(&options, &err);
                return Err(err);
            }
        };

        let handle = Self {
            id: Uuid::new_v4(),
            executor: Executor::new(tx),
            options,
            logger,
            observers: Arc::new(RwLock::new(Vec::new())),
            detached: false,
        };
        handle
            .logger
            .began(handle.id, options.set_transaction_statement().as_deref());
        Ok(handle)
    }

    /// A handle bound to no transaction, used by the null manager.
    pub(crate) fn detached(logger: TxLogger) -> Self {
        Self {
            id: Uuid::new_v4(),
            executor: Executor::detached(),
            options: TxOptions::default(),
            logger,
            observers: Arc::new(RwLock::new(Vec::new())),
            detached: true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> TxOptions {
        self.options
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Get the executor for this handle (provides access to the transaction).
    pub fn executor(&self) -> &Executor<D::Transaction> {
        &self.executor
    }

    /// Register a component that needs to be notified of transaction events.
    ///
    /// Observers of a detached handle are never notified.
    pub fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    /// Resolve the transaction from the unit of work's outcome.
    ///
    /// Without an error the transaction is committed and a commit failure
    /// becomes the reported error, with the value kept. With an error the
    /// transaction is rolled back and the unit of work's own outcome is
    /// reported unchanged; a rollback failure is only logged.
    pub(crate) async fn finalize<T>(self, ctx: &TxContext, outcome: TxOutcome<T>) -> TxOutcome<T> {
        match outcome.into_commit_candidate() {
            Ok(value) => match self.commit(ctx).await {
                Ok(()) => TxOutcome::succeeded(value),
                Err(err) => TxOutcome::partial(value, err),
            },
            Err((value, cause)) => {
                self.rollback(&cause).await;
                match value {
                    Some(value) => TxOutcome::partial(value, cause),
                    None => TxOutcome::failed(cause),
                }
            }
        }
    }

    async fn commit(&self, ctx: &TxContext) -> TransactionResult<()> {
        let tx = self.executor.take_transaction().await?;

        // Cancelled before the commit was sent: nothing may be committed, but
        // the transaction still has to be resolved.
        if ctx.is_cancelled() {
            let cause = TransactionError::CommitFailed(DriverError::Cancelled);
            match tx.rollback().await {
                Ok(()) => {
                    self.logger.rolled_back(self.id, &cause);
                    self.notify(Stage::Rollback).await;
                }
                Err(err) => {
                    let err = TransactionError::RollbackFailed(DriverError::Database(err));
                    self.logger.rollback_failed(self.id, &err, &cause);
                }
            }
            return Err(cause);
        }

        let committed = match ctx.run_until_cancelled(tx.commit()).await {
            Some(result) => result.map_err(DriverError::Database),
            None => Err(DriverError::Cancelled),
        };
        match committed {
            Ok(()) => {
                self.logger.committed(self.id);
                self.notify(Stage::Commit).await;
                Ok(())
            }
            Err(cause) => {
                let err = TransactionError::CommitFailed(cause);
                self.logger.commit_failed(self.id, &err);
                Err(err)
            }
        }
    }

    async fn rollback(&self, cause: &TransactionError) {
        let rolled_back = match self.executor.take_transaction().await {
            Ok(tx) => tx
                .rollback()
                .await
                .map_err(|err| TransactionError::RollbackFailed(DriverError::Database(err))),
            Err(err) => Err(err),
        };

        match rolled_back {
            Ok(()) => {
                self.logger.rolled_back(self.id, cause);
                self.notify(Stage::Rollback).await;
            }
            Err(err) => self.logger.rollback_failed(self.id, &err, cause),
        }
    }

    async fn notify(&self, stage: Stage) {
        let observers = self.observers.read().clone();
        for observer in observers.iter() {
            let notified = match stage {
                Stage::Commit => observer.on_commit().await,
                Stage::Rollback => observer.on_rollback().await,
            };
            if let Err(err) = notified {
                self.logger.observer_failed(self.id, stage.as_str(), &err);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Stage {
    Commit,
    Rollback,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Commit => "commit",
            Stage::Rollback => "rollback",
        }
    }
}

impl<D: Database> Clone for TxHandle<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            executor: self.executor.clone(),
            options: self.options,
            logger: self.logger.clone(),
            observers: Arc::clone(&self.observers),
            detached: self.detached,
        }
    }
}

impl<D: Database> fmt::Debug for TxHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxHandle")
            .field("id", &self.id)
            .field("executor", &self.executor)
            .field("options", &self.options)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

/// A unit of work may start further, independent units of work through the
/// handle it was given. A detached handle keeps them detached.
#[async_trait]
impl<D: Database> TransactionManager<D> for TxHandle<D> {
    async fn exec_tx<T, F, Fut, P>(&self, ctx: &TxContext, f: F, provider: &P) -> TxOutcome<T>
    where
        T: Send,
        F: FnOnce(TxContext, TxHandle<D>) -> Fut + Send,
        Fut: Future + Send,
        Fut::Output: Into<TxOutcome<T>>,
        P: ResourceProvider<Database = D> + ?Sized,
    {
        if self.detached {
            let manager = NullTransactionManager::with_logger(self.logger.clone());
            TransactionManager::<D>::exec_tx(&manager, ctx, f, provider).await
        } else {
            let manager = SqlTransactionManager::new()
                .with_options(self.options)
                .with_logger(self.logger.clone());
            TransactionManager::<D>::exec_tx(&manager, ctx, f, provider).await
        }
    }

    fn get_tx(&self) -> Option<Executor<D::Transaction>> {
        (!self.detached).then(|| self.executor.clone())
    }
}
