//! Store Operation Error Hierarchy
//!
//! Failures of individual store calls are values, not exceptions: they ride
//! inside the [`OperationResult`](crate::OperationResult) an operation
//! produces, so callers can branch on them the way the write path branches
//! on a missing node. The types here are that vocabulary.

use std::time::Duration;

use crate::session::StoreCode;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure of a single store round trip
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Adapter configuration validation failures
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why one store call did not produce its result.
///
/// Carried by [`OperationResult::error`](crate::OperationResult::error);
/// never returned as a bare `Err` by the operations themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// The target node does not exist
    #[error("Node '{path}' does not exist")]
    NodeMissing { path: String },

    /// A conditional write lost against a concurrent update
    #[error("Version conflict on '{path}': expected version {expected}")]
    VersionConflict { path: String, expected: i32 },

    /// The session lost its connection while the call was in flight
    #[error("Connection to the store was lost")]
    ConnectionLoss,

    /// The session expired; ephemeral nodes it owned are gone
    #[error("Session expired")]
    SessionExpired,

    /// No callback arrived within the configured bound
    #[error("No reply from the store within {bound:?}")]
    Timeout { bound: Duration },

    /// The reply did not match the issued call
    #[error("Malformed reply: {detail}")]
    Decode { detail: String },

    /// A watch instance that already delivered was asked to wait again
    #[error("Watch on '{path}' already delivered its event")]
    WatchSpent { path: String },

    /// Any other store result code, kept verbatim
    #[error("Store error {code:?} on '{path}'")]
    Store { code: StoreCode, path: String },
}

impl OperationError {
    /// The store result code this failure maps back to, for callers that
    /// branch on codes rather than variants.
    pub fn code(&self) -> StoreCode {
        match self {
            OperationError::NodeMissing { .. } => StoreCode::NoNode,
            OperationError::VersionConflict { .. } => StoreCode::BadVersion,
            OperationError::ConnectionLoss => StoreCode::ConnectionLoss,
            OperationError::SessionExpired => StoreCode::SessionExpired,
            OperationError::Timeout { .. } => StoreCode::OperationTimeout,
            OperationError::Decode { .. } => StoreCode::Marshalling,
            OperationError::WatchSpent { .. } => StoreCode::BadArguments,
            OperationError::Store { code, .. } => *code,
        }
    }
}
