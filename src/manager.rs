use async_trait::async_trait;
use std::future::Future;

use crate::{
    Database, Executor, ResourceProvider, TransactionConfig, TxContext, TxHandle,
    TxLogger, TxOptions, TxOutcome,
};

/// Runs units of work inside transactions.
///
/// `exec_tx` is the only way to run a unit of work, and it always resolves
/// the transaction it began: callers cannot forget to commit or roll back.
#[async_trait]
pub trait TransactionManager<D: Database>: Send + Sync {
    /// Begin a transaction against `provider`, run `f` with a handle bound to
    /// it, then commit if `f` succeeded or roll back if it reported an error.
    ///
    /// `f` may return a `TransactionResult<T>` or a [`TxOutcome<T>`]; the
    /// latter lets it hand back a partial value alongside its error.
    ///
    /// If the transaction cannot begin, `f` is never invoked.
    async fn exec_tx<T, F, Fut, P>(&self, ctx: &TxContext, f: F, provider: &P) -> TxOutcome<T>
    where
        T: Send,
        F: FnOnce(TxContext, TxHandle<D>) -> Fut + Send,
        Fut: Future + Send,
        Fut::Output: Into<TxOutcome<T>>,
        P: ResourceProvider<Database = D> + ?Sized;

    /// The transaction this manager is bound to, if any.
    fn get_tx(&self) -> Option<Executor<D::Transaction>>;
}

/// Default implementation of TransactionManager for SQL databases.
///
/// The manager itself holds no transaction and may be shared freely; each
/// `exec_tx` call begins its own.
#[derive(Debug, Clone, Default)]
pub struct SqlTransactionManager {
    options: TxOptions,
    logger: TxLogger,
}

impl SqlTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TransactionConfig) -> Self {
        Self::new().with_options(config.default_options)
    }

    /// Options used by `exec_tx` when beginning a transaction.
    pub fn with_options(mut self, options: TxOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: TxLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> TxOptions {
        self.options
    }

    /// Like `exec_tx`, but begins the transaction with `options` instead of
    /// the manager's defaults.
    pub async fn exec_tx_with_options<D, T, F, Fut, P>(
        &self,
        ctx: &TxContext,
        options: TxOptions,
        f: F,
        provider: &P,
    ) -> TxOutcome<T>
    where
        D: Database,
        F: FnOnce(TxContext, TxHandle<D>) -> Fut,
        Fut: Future,
        Fut::Output: Into<TxOutcome<T>>,
        P: ResourceProvider<Database = D> + ?Sized,
    {
        let handle = match TxHandle::begin(ctx, provider.database(), options, self.logger.clone()).await {
            Ok(handle) => handle,
            Err(err) => return TxOutcome::failed(err),
        };

        let outcome: TxOutcome<T> = f(ctx.clone(), handle.clone()).await.into();
        handle.finalize(ctx, outcome).await
    }
}

#[async_trait]
impl<D: Database> TransactionManager<D> for SqlTransactionManager {
    async fn exec_tx<T, F, Fut, P>(&self, ctx: &TxContext, f: F, provider: &P) -> TxOutcome<T>
    where
        T: Send,
        F: FnOnce(TxContext, TxHandle<D>) -> Fut + Send,
        Fut: Future + Send,
        Fut::Output: Into<TxOutcome<T>>,
        P: ResourceProvider<Database = D> + ?Sized,
    {
        self.exec_tx_with_options(ctx, self.options, f, provider).await
    }

    fn get_tx(&self) -> Option<Executor<D::Transaction>> {
        None
    }
}
