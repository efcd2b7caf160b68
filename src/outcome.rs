use crate::{TransactionError, TransactionResult};

/// What a transaction manager reports for one unit of work.
///
/// A value is present when the unit of work produced one; an error is present
/// when beginning, the unit of work itself, or the commit failed. Both are
/// present when the commit failed after the unit of work succeeded, or when
/// the unit of work returned a partial value along with its error.
#[must_use]
#[derive(Debug)]
pub struct TxOutcome<T> {
    state: State<T>,
}

#[derive(Debug)]
enum State<T> {
    Succeeded(T),
    Failed(TransactionError),
    Partial(T, TransactionError),
}

impl<T> TxOutcome<T> {
    pub(crate) fn succeeded(value: T) -> Self {
        Self {
            state: State::Succeeded(value),
        }
    }

    pub(crate) fn failed(error: TransactionError) -> Self {
        Self {
            state: State::Failed(error),
        }
    }

    /// A value together with the error that decides the transaction's fate.
    ///
    /// Returned from a unit of work, the transaction is rolled back and both
    /// are handed back to the caller.
    pub fn partial(value: T, error: TransactionError) -> Self {
        Self {
            state: State::Partial(value, error),
        }
    }

    /// The value to commit, or whatever value survives next to the error.
    pub(crate) fn into_commit_candidate(self) -> Result<T, (Option<T>, TransactionError)> {
        match self.state {
            State::Succeeded(value) => Ok(value),
            State::Failed(error) => Err((None, error)),
            State::Partial(value, error) => Err((Some(value), error)),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            State::Succeeded(value) | State::Partial(value, _) => Some(value),
            State::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TransactionError> {
        match &self.state {
            State::Failed(error) | State::Partial(_, error) => Some(error),
            State::Succeeded(_) => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.state, State::Succeeded(_))
    }

    pub fn into_parts(self) -> (Option<T>, Option<TransactionError>) {
        match self.state {
            State::Succeeded(value) => (Some(value), None),
            State::Failed(error) => (None, Some(error)),
            State::Partial(value, error) => (Some(value), Some(error)),
        }
    }

    /// Collapses the outcome into a `Result`; a value next to an error is
    /// discarded.
    pub fn into_result(self) -> TransactionResult<T> {
        match self.state {
            State::Succeeded(value) => Ok(value),
            State::Failed(error) | State::Partial(_, error) => Err(error),
        }
    }
}

impl<T> From<TransactionResult<T>> for TxOutcome<T> {
    fn from(result: TransactionResult<T>) -> Self {
        match result {
            Ok(value) => Self::succeeded(value),
            Err(error) => Self::failed(error),
        }
    }
}
