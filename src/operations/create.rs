use std::sync::Arc;
use std::time::Duration;

use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::operations::round_trip;
use crate::operations::unexpected_reply;
use crate::operations::validate_path;
use crate::operations::OperationResult;
use crate::session::AclEntry;
use crate::session::CallReply;
use crate::session::CreateMode;
use crate::session::StoreCall;
use crate::session::StoreSession;
use crate::session::DEFAULT_ACL;

/// Create a node.
///
/// Defaults to [`CreateMode::Ephemeral`] under the open `world:anyone`
/// access rules; both can be overridden per call. The successful payload is
/// the path the store actually created; for sequential modes that is the
/// requested path plus a store-assigned counter suffix.
pub struct CreateOperation {
    session: Arc<dyn StoreSession>,
    path: String,
    payload: Vec<u8>,
    acl: Vec<AclEntry>,
    mode: CreateMode,
    timeout: Duration,
}

impl CreateOperation {
    /// New create with the default mode and access rules.
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
            acl: DEFAULT_ACL.clone(),
            mode: CreateMode::default(),
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Replace the access rules. An unusable set is the store's call to
    /// reject, not ours.
    pub fn with_acl(
        mut self,
        acl: Vec<AclEntry>,
    ) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_mode(
        mut self,
        mode: CreateMode,
    ) -> Self {
        self.mode = mode;
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

    /// Issue the create and wait for its outcome.
    pub async fn execute(&self) -> OperationResult<String> {
        let call = StoreCall::Create {
            path: self.path.clone(),
            payload: self.payload.clone(),
            acl: self.acl.clone(),
            mode: self.mode,
        };
        match round_trip(self.session.as_ref(), call, self.timeout).await {
            Ok(CallReply::Created { path }) => OperationResult::ok(path, None),
            Ok(other) => OperationResult::failed(unexpected_reply("create", other)),
            Err(error) => OperationResult::failed(error),
        }
    }
}
