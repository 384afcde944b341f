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

/// List a node's children.
///
/// An existing node with no children is a successful empty listing; only a
/// missing node fails. Names come back in store order, without their parent
/// prefix.
pub struct GetChildrenOperation {
    session: Arc<dyn StoreSession>,
    path: String,
    timeout: Duration,
}

impl GetChildrenOperation {
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

    /// Issue the listing and wait for its outcome.
    pub async fn execute(&self) -> OperationResult<Vec<String>> {
        let call = StoreCall::GetChildren {
            path: self.path.clone(),
        };
        match round_trip(self.session.as_ref(), call, self.timeout).await {
            Ok(CallReply::Children { children }) => OperationResult::ok(children, None),
            Ok(other) => OperationResult::failed(unexpected_reply("get-children", other)),
            Err(error) => OperationResult::failed(error),
        }
    }
}
