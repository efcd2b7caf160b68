//! Postgres Transaction Manager
//!
//! This crate runs a caller supplied unit of work inside a single database
//! transaction. The transaction is committed when the work succeeds and rolled
//! back when it fails. A null manager with the same contract lets business logic
//! be tested without a database.

pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod executor;
pub mod handle;
pub mod logger;
pub mod manager;
pub mod null;
pub mod options;
pub mod outcome;
pub mod transaction_aware;

pub use config::{ConfigError, TransactionConfig};
pub use context::TxContext;
pub use database::{Database, DatabaseTransaction, ManagedResource, ResourceProvider};
pub use error::{DriverError, TransactionError, TransactionResult};
pub use executor::Executor;
pub use handle::TxHandle;
pub use logger::TxLogger;
pub use manager::{SqlTransactionManager, TransactionManager};
pub use null::NullTransactionManager;
pub use options::{IsolationLevel, TxOptions};
pub use outcome::TxOutcome;
pub use transaction_aware::TransactionAware;
