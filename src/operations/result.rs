//! Typed outcome of one store operation.

use crate::errors::OperationError;
use crate::session::NodeStat;
use crate::session::StoreCode;

/// Immutable outcome of one operation attempt.
///
/// Store-level failures are encoded here rather than raised, so a caller can
/// branch on them the way the write path branches on a missing node:
///
/// - a successful attempt carries the decoded payload (for operations that
///   produce one) and whatever statistics the store reported;
/// - a failed attempt carries an [`OperationError`] and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult<T> {
    value: Option<T>,
    statistics: Option<NodeStat>,
    error: Option<OperationError>,
}

impl<T> OperationResult<T> {
    /// Successful outcome with a decoded payload.
    pub(crate) fn ok(
        value: T,
        statistics: Option<NodeStat>,
    ) -> Self {
        Self {
            value: Some(value),
            statistics,
            error: None,
        }
    }

    /// Successful outcome of an attempt that produces no payload.
    pub(crate) fn ok_empty(statistics: Option<NodeStat>) -> Self {
        Self {
            value: None,
            statistics,
            error: None,
        }
    }

    /// Failed outcome.
    pub(crate) fn failed(error: OperationError) -> Self {
        Self {
            value: None,
            statistics: None,
            error: Some(error),
        }
    }

    /// Whether the attempt succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Decoded payload, when the operation produces one and succeeded.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Node statistics reported by the store, when the call carries them.
    pub fn statistics(&self) -> Option<&NodeStat> {
        self.statistics.as_ref()
    }

    /// The failure, when there is one.
    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    /// Store code of the failure, when there is one.
    pub fn error_code(&self) -> Option<StoreCode> {
        self.error.as_ref().map(OperationError::code)
    }

    /// Whether the attempt failed with the given store code.
    ///
    /// This is the branching writes do on [`StoreCode::NoNode`] to decide
    /// whether a create fallback applies.
    pub fn failed_due_to(
        &self,
        code: StoreCode,
    ) -> bool {
        self.error_code() == Some(code)
    }

    /// Consume the result, keeping only the payload.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Consume the result, keeping only the failure.
    pub fn into_error(self) -> Option<OperationError> {
        self.error
    }

    /// Decompose into payload, statistics and failure.
    pub fn into_parts(self) -> (Option<T>, Option<NodeStat>, Option<OperationError>) {
        (self.value, self.statistics, self.error)
    }
}
