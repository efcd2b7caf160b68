use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use postgres_tx_manager::{
    Database, DatabaseTransaction, ResourceProvider, TransactionAware, TransactionError,
    TransactionResult, TxOptions,
};

/// Failures the fake database should produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct Script {
    pub fail_begin: bool,
    pub hang_begin: bool,
    pub fail_commit: bool,
    pub hang_commit: bool,
    pub fail_rollback: bool,
}

#[derive(Default)]
struct FakeState {
    script: Mutex<Script>,
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    options: Mutex<Vec<TxOptions>>,
    committed: Mutex<Vec<String>>,
}

/// In-memory database that records every begin, commit and rollback.
#[derive(Clone, Default)]
pub struct FakeDatabase {
    state: Arc<FakeState>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(script: Script) -> Self {
        let db = Self::new();
        *db.state.script.lock() = script;
        db
    }

    /// Number of transactions the database was asked to begin.
    pub fn begins(&self) -> usize {
        self.state.begins.load(Ordering::SeqCst)
    }

    /// Number of commit attempts, successful or not.
    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    /// Number of rollback attempts, successful or not.
    pub fn rollbacks(&self) -> usize {
        self.state.rollbacks.load(Ordering::SeqCst)
    }

    pub fn finalizations(&self) -> usize {
        self.commits() + self.rollbacks()
    }

    pub fn options_seen(&self) -> Vec<TxOptions> {
        self.state.options.lock().clone()
    }

    /// Statements made durable by successful commits.
    pub fn committed(&self) -> Vec<String> {
        self.state.committed.lock().clone()
    }
}

#[async_trait]
impl Database for FakeDatabase {
    type Transaction = FakeTransaction;

    async fn begin_transaction(&self, options: &TxOptions) -> Result<FakeTransaction, sqlx::Error> {
        self.state.begins.fetch_add(1, Ordering::SeqCst);
        let script = *self.state.script.lock();
        if script.hang_begin {
            std::future::pending::<()>().await;
        }
        if script.fail_begin {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.state.options.lock().push(*options);
        Ok(FakeTransaction {
            state: Arc::clone(&self.state),
            pending: Vec::new(),
            finished: false,
        })
    }
}

impl ResourceProvider for FakeDatabase {
    type Database = FakeDatabase;

    fn database(&self) -> &FakeDatabase {
        self
    }
}

/// Transaction of the fake database; statements become visible on commit.
///
/// Dropping it unfinished counts as a rollback, as sqlx does for a dropped
/// `Transaction`.
pub struct FakeTransaction {
    state: Arc<FakeState>,
    pending: Vec<String>,
    finished: bool,
}

impl Drop for FakeTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl FakeTransaction {
    pub fn execute(&mut self, statement: &str) {
        self.pending.push(statement.to_string());
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }
}

#[async_trait]
impl DatabaseTransaction for FakeTransaction {
    async fn commit(mut self) -> Result<(), sqlx::Error> {
        let script = *self.state.script.lock();
        if script.hang_commit {
            std::future::pending::<()>().await;
        }
        self.finished = true;
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        if script.fail_commit {
            return Err(sqlx::Error::Protocol("commit rejected".to_string()));
        }
        let pending = std::mem::take(&mut self.pending);
        self.state.committed.lock().extend(pending);
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), sqlx::Error> {
        self.finished = true;
        self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        if self.state.script.lock().fail_rollback {
            return Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "connection reset during rollback",
            )));
        }
        Ok(())
    }
}

/// Observer that counts lifecycle notifications and can be told to fail.
#[derive(Default)]
pub struct RecordingObserver {
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail: bool,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> TransactionResult<()> {
        if self.fail {
            Err(TransactionError::aborted("cache refresh failed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TransactionAware for RecordingObserver {
    async fn on_commit(&self) -> TransactionResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }
}
