use std::sync::Arc;
use std::time::Duration;

use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::operations::round_trip;
use crate::operations::unexpected_reply;
use crate::operations::validate_path;
use crate::operations::OperationResult;
use crate::session::CallReply;
use crate::session::StoreCall;
use crate::session::StoreSession;

/// Probe a node's statistics without reading its payload.
///
/// A missing node is an ordinary `NodeMissing` failure, so existence reduces
/// to [`OperationResult::is_ok`].
pub struct ExistsOperation {
    session: Arc<dyn StoreSession>,
    path: String,
    timeout: Duration,
}

impl ExistsOperation {
    /// # Panics
    ///
    /// Panics when `path` is empty or relative.
    pub fn new(
        session: Arc<dyn StoreSession>,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        validate_path(&path);
        Self {
            session,
            path,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
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

    /// Issue the probe and wait for its outcome.
    pub async fn execute(&self) -> OperationResult<()> {
        let call = StoreCall::Exists {
            path: self.path.clone(),
        };
        match round_trip(self.session.as_ref(), call, self.timeout).await {
            Ok(CallReply::Stat { stat }) => OperationResult::ok_empty(Some(stat)),
            Ok(other) => OperationResult::failed(unexpected_reply("exists", other)),
            Err(error) => OperationResult::failed(error),
        }
    }
}
