use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::{TransactionManager, TxOptions};

/// A connection source capable of beginning transactions.
///
/// The pool behind an implementation may be shared by many concurrent
/// `exec_tx` calls; every call begins its own independent transaction.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    type Transaction: DatabaseTransaction;

    /// Begin a new transaction, applying `options` before returning it.
    async fn begin_transaction(&self, options: &TxOptions) -> Result<Self::Transaction, sqlx::Error>;
}

/// One live transaction as seen by the driver.
///
/// Dropping a transaction that was neither committed nor rolled back must roll
/// it back. That happens when a commit in flight is abandoned because the
/// caller cancelled.
#[async_trait]
pub trait DatabaseTransaction: Send + Sized + 'static {
    async fn commit(self) -> Result<(), sqlx::Error>;

    async fn rollback(self) -> Result<(), sqlx::Error>;
}

/// Supplies the database that transactions are begun against.
///
/// Repositories implement this so a transaction manager can be handed the
/// repository itself rather than its pool.
pub trait ResourceProvider: Send + Sync {
    type Database: Database;

    fn database(&self) -> &Self::Database;
}

/// A resource provider that also carries the transaction manager its callers
/// should use, so services can compose units of work without knowing which
/// manager variant they were given.
pub trait ManagedResource: ResourceProvider {
    type Manager: TransactionManager<Self::Database>;

    fn transaction_manager(&self) -> &Self::Manager;
}

#[async_trait]
impl Database for PgPool {
    type Transaction = Transaction<'static, Postgres>;

    async fn begin_transaction(&self, options: &TxOptions) -> Result<Self::Transaction, sqlx::Error> {
        let mut tx = self.begin().await?;
        if let Some(statement) = options.set_transaction_statement() {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        Ok(tx)
    }
}

#[async_trait]
impl DatabaseTransaction for Transaction<'static, Postgres> {
    async fn commit(self) -> Result<(), sqlx::Error> {
        Transaction::commit(self).await
    }

    async fn rollback(self) -> Result<(), sqlx::Error> {
        Transaction::rollback(self).await
    }
}

impl ResourceProvider for PgPool {
    type Database = PgPool;

    fn database(&self) -> &Self::Database {
        self
    }
}

#[async_trait]
impl<D: Database> Database for Arc<D> {
    type Transaction = D::Transaction;

    async fn begin_transaction(&self, options: &TxOptions) -> Result<Self::Transaction, sqlx::Error> {
        (**self).begin_transaction(options).await
    }
}

impl<P: ResourceProvider> ResourceProvider for Arc<P> {
    type Database = P::Database;

    fn database(&self) -> &Self::Database {
        (**self).database()
    }
}
