//! Tagged call and reply model of the session boundary.

use super::AclEntry;
use super::CreateMode;
use super::NodeStat;
use super::StoreCode;

/// One asynchronous store call.
///
/// Every operation issues exactly one of these per execution; recovery
/// decisions (such as creating a missing node) are made by the caller and
/// show up as a second, differently tagged call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// Conditional write of a node's payload.
    SetData {
        path: String,
        payload: Vec<u8>,
        /// Version the node must currently have, or
        /// [`ANY_VERSION`](crate::ANY_VERSION) to write unconditionally.
        expected_version: i32,
    },
    /// Create a node.
    Create {
        path: String,
        payload: Vec<u8>,
        acl: Vec<AclEntry>,
        mode: CreateMode,
    },
    /// List a node's children.
    GetChildren { path: String },
    /// Read a node's payload.
    GetData { path: String },
    /// Probe a node's statistics without reading its payload.
    Exists { path: String },
}

impl StoreCall {
    /// Path the call targets.
    pub fn path(&self) -> &str {
        match self {
            StoreCall::SetData { path, .. } => path,
            StoreCall::Create { path, .. } => path,
            StoreCall::GetChildren { path } => path,
            StoreCall::GetData { path } => path,
            StoreCall::Exists { path } => path,
        }
    }

    /// Stable name of the call kind, for logs and decode diagnostics.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            StoreCall::SetData { .. } => "set-data",
            StoreCall::Create { .. } => "create",
            StoreCall::GetChildren { .. } => "get-children",
            StoreCall::GetData { .. } => "get-data",
            StoreCall::Exists { .. } => "exists",
        }
    }
}

/// Success payload of one store call, tagged to mirror [`StoreCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallReply {
    /// Statistics after a write or an existence probe.
    Stat { stat: NodeStat },
    /// Path of a created node. Differs from the requested path for
    /// sequential modes, which carry a store-assigned counter suffix.
    Created { path: String },
    /// Child names, in store order.
    Children { children: Vec<String> },
    /// Node payload together with its statistics.
    Data { payload: Vec<u8>, stat: NodeStat },
}

/// What a session callback delivers: the result code, plus the reply when
/// the code is [`StoreCode::Ok`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallComplete {
    pub code: StoreCode,
    pub reply: Option<CallReply>,
}

impl CallComplete {
    /// Successful completion carrying a reply.
    pub fn ok(reply: CallReply) -> Self {
        Self {
            code: StoreCode::Ok,
            reply: Some(reply),
        }
    }

    /// Failed completion carrying only the code.
    pub fn err(code: StoreCode) -> Self {
        Self { code, reply: None }
    }
}
