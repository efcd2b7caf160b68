use async_trait::async_trait;
use std::future::Future;

use crate::{
    Database, Executor, ResourceProvider, TransactionManager, TxContext, TxHandle,
    TxLogger, TxOutcome,
};

/// A transaction manager that never touches a database.
///
/// The unit of work runs directly with a detached handle and its result is
/// returned unchanged: nothing is begun, committed or rolled back. Use it to
/// test business logic that needs some transaction manager but no persistence.
#[derive(Debug, Clone, Default)]
pub struct NullTransactionManager {
    logger: TxLogger,
}

impl NullTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: TxLogger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl<D: Database> TransactionManager<D> for NullTransactionManager {
    async fn exec_tx<T, F, Fut, P>(&self, ctx: &TxContext, f: F, _provider: &P) -> TxOutcome<T>
    where
        T: Send,
        F: FnOnce(TxContext, TxHandle<D>) -> Fut + Send,
        Fut: Future + Send,
        Fut::Output: Into<TxOutcome<T>>,
        P: ResourceProvider<Database = D> + ?Sized,
    {
        let handle = TxHandle::detached(self.logger.clone());
        f(ctx.clone(), handle).await.into()
    }

    fn get_tx(&self) -> Option<Executor<D::Transaction>> {
        None
    }
}
