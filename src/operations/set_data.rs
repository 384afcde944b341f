use std::sync::Arc;
use std::time::Duration;

use crate::constants::ANY_VERSION;
use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::operations::round_trip;
use crate::operations::unexpected_reply;
use crate::operations::validate_path;
use crate::operations::OperationResult;
use crate::session::CallReply;
use crate::session::StoreCall;
use crate::session::StoreSession;

/// Conditional write of a node's payload.
///
/// Succeeds only when the node exists and, unless the expected version is
/// [`ANY_VERSION`], its current version matches. Produces statistics, never
/// a payload; a missing node is reported as a failure for the caller to
/// interpret, not recovered from here.
pub struct SetDataOperation {
    session: Arc<dyn StoreSession>,
    path: String,
    payload: Vec<u8>,
    expected_version: i32,
    timeout: Duration,
}

impl SetDataOperation {
    /// New unconditional write (expected version [`ANY_VERSION`]).
    ///
    /// # Panics
    ///
    /// Panics when `path` is empty or relative.
    pub fn new(
        session: Arc<dyn StoreSession>,
        path: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        let path = path.into();
        validate_path(&path);
        Self {
            session,
            path,
            payload,
            expected_version: ANY_VERSION,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Require the node to currently have `version`. [`ANY_VERSION`]
    /// restores the unconditional behaviour.
    pub fn with_version(
        mut self,
        version: i32,
    ) -> Self {
        self.expected_version = version;
        self
    }

    /// Override the reply bound.
    pub fn with_timeout(
        mut self,
        bound: Duration,
    ) -> Self {
        self.timeout = bound;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Issue the write and wait for its outcome.
    pub async fn execute(&self) -> OperationResult<()> {
        let call = StoreCall::SetData {
            path: self.path.clone(),
            payload: self.payload.clone(),
            expected_version: self.expected_version,
        };
        match round_trip(self.session.as_ref(), call, self.timeout).await {
            Ok(CallReply::Stat { stat }) => OperationResult::ok_empty(Some(stat)),
            Ok(other) => OperationResult::failed(unexpected_reply("set-data", other)),
            Err(error) => OperationResult::failed(error),
        }
    }
}
