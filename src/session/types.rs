//! Data vocabulary shared between calls, replies and watch events.

use lazy_static::lazy_static;
use serde::Deserialize;
use serde::Serialize;

/// Statistics the store keeps per node.
///
/// Every field is reported by the store itself; this layer never computes or
/// patches any of them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStat {
    /// Transaction id of the change that created the node.
    pub czxid: i64,
    /// Transaction id of the change that last modified the node.
    pub mzxid: i64,
    /// Creation time, in milliseconds since the epoch.
    pub ctime: i64,
    /// Last-modification time, in milliseconds since the epoch.
    pub mtime: i64,
    /// Number of changes to the node's payload.
    pub version: i32,
    /// Number of changes to the node's children.
    pub cversion: i32,
    /// Number of changes to the node's access rules.
    pub aversion: i32,
    /// Session id of the owner when the node is ephemeral, zero otherwise.
    pub ephemeral_owner: i64,
    /// Length of the node's payload, in bytes.
    pub data_length: i32,
    /// Number of children.
    pub num_children: i32,
    /// Transaction id of the change that last modified the node's children.
    pub pzxid: i64,
}

/// How a node is created and how long it lives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum CreateMode {
    /// Survives the session that created it.
    Persistent = 0,
    /// Removed by the store when the creating session ends.
    ///
    /// The default: nodes created on behalf of a write recovery should not
    /// outlive the session that wrote them.
    #[default]
    Ephemeral = 1,
    /// Persistent, with a monotonic counter appended to the path by the
    /// store.
    PersistentSequential = 2,
    /// Ephemeral, with a monotonic counter appended to the path by the
    /// store.
    EphemeralSequential = 3,
    /// Persistent until its last child is gone, then a candidate for
    /// store-side cleanup.
    Container = 4,
}

impl CreateMode {
    /// Whether nodes of this mode die with their creating session.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    /// Whether the store appends a counter suffix to the requested path.
    pub fn is_sequential(&self) -> bool {
        matches!(
            self,
            CreateMode::PersistentSequential | CreateMode::EphemeralSequential
        )
    }
}

/// Permission bits access rules are composed of.
pub mod perms {
    pub const READ: u32 = 1;
    pub const WRITE: u32 = 1 << 1;
    pub const CREATE: u32 = 1 << 2;
    pub const DELETE: u32 = 1 << 3;
    pub const ADMIN: u32 = 1 << 4;
    pub const ALL: u32 = READ | WRITE | CREATE | DELETE | ADMIN;
}

/// One access-rule entry on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// Bitmask over [`perms`].
    pub perms: u32,
    /// Authentication scheme `id` is interpreted under.
    pub scheme: String,
    /// Identity the permissions are granted to.
    pub id: String,
}

impl AclEntry {
    /// Grant everything to everyone under the `world` scheme.
    pub fn world_anyone() -> Self {
        Self {
            perms: perms::ALL,
            scheme: "world".to_string(),
            id: "anyone".to_string(),
        }
    }
}

lazy_static! {
    /// Access rules applied when a caller supplies none.
    pub static ref DEFAULT_ACL: Vec<AclEntry> = vec![AclEntry::world_anyone()];
}

/// Result code of one store call.
///
/// Numeric values follow the store's wire protocol so raw codes observed in
/// logs line up with what the store reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StoreCode {
    Ok = 0,
    /// Catch-all for store-side failures this layer has no name for.
    SystemError = -1,
    /// The connection dropped while the call was in flight.
    ConnectionLoss = -4,
    /// A call or reply could not be encoded or decoded.
    Marshalling = -5,
    Unimplemented = -6,
    /// The store gave up on the call before completing it.
    OperationTimeout = -7,
    BadArguments = -8,
    /// The target node does not exist.
    NoNode = -101,
    NoAuth = -102,
    /// The expected version did not match the node's current version.
    BadVersion = -103,
    /// Ephemeral nodes cannot have children.
    NoChildrenForEphemerals = -108,
    /// The node already exists.
    NodeExists = -110,
    /// The node still has children.
    NotEmpty = -111,
    /// The session expired; its ephemeral nodes are gone.
    SessionExpired = -112,
    /// The supplied access rules are unusable.
    InvalidAcl = -114,
}

impl StoreCode {
    /// Map a raw numeric code reported by the store.
    ///
    /// Unknown numbers collapse to [`StoreCode::SystemError`] rather than
    /// failing: stores grow codes faster than clients learn them.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => StoreCode::Ok,
            -4 => StoreCode::ConnectionLoss,
            -5 => StoreCode::Marshalling,
            -6 => StoreCode::Unimplemented,
            -7 => StoreCode::OperationTimeout,
            -8 => StoreCode::BadArguments,
            -101 => StoreCode::NoNode,
            -102 => StoreCode::NoAuth,
            -103 => StoreCode::BadVersion,
            -108 => StoreCode::NoChildrenForEphemerals,
            -110 => StoreCode::NodeExists,
            -111 => StoreCode::NotEmpty,
            -112 => StoreCode::SessionExpired,
            -114 => StoreCode::InvalidAcl,
            _ => StoreCode::SystemError,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StoreCode::Ok)
    }
}

/// Kinds of node change a watch can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchEventKind {
    /// The node came into existence.
    NodeCreated,
    /// The node was deleted.
    NodeDeleted,
    /// The node's payload changed.
    DataChanged,
    /// The node's set of children changed.
    ChildrenChanged,
}

/// One fired watch notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path the watch was installed on.
    pub path: String,
    /// What happened to the node.
    pub kind: WatchEventKind,
}
