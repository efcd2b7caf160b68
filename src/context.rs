use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Per-call context handed to the transaction manager and on to the unit of work.
///
/// It carries the caller's cancellation token. Beginning and committing a
/// transaction race against the token; statements issued by the unit of work
/// may consult it through [`TxContext::is_cancelled`] or
/// [`TxContext::cancellation_token`].
#[derive(Debug, Clone, Default)]
pub struct TxContext {
    cancellation: CancellationToken,
}

impl TxContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drives `fut` to completion unless the token fires first, in which
    /// case `fut` is dropped and `None` is returned.
    pub(crate) async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => None,
            output = fut => Some(output),
        }
    }
}
