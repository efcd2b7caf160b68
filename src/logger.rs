use std::fmt;
use tracing::Dispatch;
use uuid::Uuid;

use crate::{TransactionError, TxOptions};

/// Diagnostic sink for transaction lifecycle events.
///
/// A logger built with [`TxLogger::with_dispatch`] sends every event to that
/// dispatcher, whatever the process default is. The default logger forwards to
/// the process default subscriber.
#[derive(Clone, Default)]
pub struct TxLogger {
    dispatch: Option<Dispatch>,
}

impl TxLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    fn emit(&self, event: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }

    pub(crate) fn began(&self, tx_id: Uuid, statement: Option<&str>) {
        self.emit(|| tracing::debug!(%tx_id, set_transaction = statement, "transaction started"));
    }

    pub(crate) fn begin_failed(&self, options: &TxOptions, error: &TransactionError) {
        self.emit(|| {
            tracing::debug!(
                isolation = ?options.isolation,
                read_only = options.read_only,
                %error,
                "transaction begin failed"
            )
        });
    }

    pub(crate) fn committed(&self, tx_id: Uuid) {
        self.emit(|| tracing::debug!(%tx_id, "transaction committed"));
    }

    pub(crate) fn commit_failed(&self, tx_id: Uuid, error: &TransactionError) {
        self.emit(|| tracing::error!(%tx_id, %error, "transaction commit error"));
    }

    pub(crate) fn rolled_back(&self, tx_id: Uuid, cause: &TransactionError) {
        self.emit(|| tracing::debug!(%tx_id, %cause, "transaction rolled back"));
    }

    pub(crate) fn rollback_failed(&self, tx_id: Uuid, error: &TransactionError, cause: &TransactionError) {
        self.emit(|| tracing::warn!(%tx_id, %error, %cause, "transaction rollback error"));
    }

    pub(crate) fn observer_failed(&self, tx_id: Uuid, stage: &'static str, error: &TransactionError) {
        self.emit(|| tracing::warn!(%tx_id, stage, %error, "transaction observer failed"));
    }
}

impl fmt::Debug for TxLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxLogger")
            .field("injected", &self.dispatch.is_some())
            .finish()
    }
}
