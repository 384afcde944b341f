//! In-memory rendition of the coordination store, faithful to its callback
//! and one-shot watch semantics.
//!
//! Calls are applied synchronously under one lock and the reply channel is
//! fulfilled before `issue` returns; watch channels installed on a path are
//! all consumed by the first event touching that path, whatever its kind.
//! Filtering and re-arming are the bridge's job, so the store deliberately
//! ignores the kinds hint.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use parking_lot::Mutex;

use crate::constants::ANY_VERSION;
use crate::constants::PATH_SEPARATOR;
use crate::session::AclEntry;
use crate::session::CallComplete;
use crate::session::CallReply;
use crate::session::CreateMode;
use crate::session::NodeStat;
use crate::session::ReplySender;
use crate::session::StoreCall;
use crate::session::StoreCode;
use crate::session::StoreSession;
use crate::session::WatchEvent;
use crate::session::WatchEventKind;
use crate::session::WatchSender;
use crate::session::DEFAULT_ACL;

/// Session id reported as the owner of ephemeral nodes.
const MEMORY_SESSION_ID: i64 = 0x00ff;

/// Width of the zero-padded counter appended to sequential node paths.
const SEQUENCE_SUFFIX_WIDTH: usize = 10;

#[derive(Debug, Clone)]
struct NodeRecord {
    payload: Vec<u8>,
    stat: NodeStat,
    acl: Vec<AclEntry>,
    mode: CreateMode,
    children: BTreeSet<String>,
}

#[derive(Default)]
struct StoreState {
    nodes: HashMap<String, NodeRecord>,
    watches: HashMap<String, Vec<WatchSender>>,
    issued: Vec<&'static str>,
    next_zxid: i64,
    next_sequence: u64,
}

/// In-memory [`StoreSession`] for tests: a versioned node tree with
/// sequential creates, ephemeral bookkeeping and one-shot watches, plus
/// direct mutators (`seed`, `overwrite`, `delete`) for driving scenarios
/// from the outside.
pub struct MemorySession {
    state: Mutex<StoreState>,
}

impl MemorySession {
    /// Empty store with the root node pre-created.
    pub fn new() -> Self {
        let session = Self {
            state: Mutex::new(StoreState::default()),
        };
        {
            let mut state = session.state.lock();
            let zxid = bump_zxid(&mut state);
            let now = now_millis();
            state.nodes.insert(
                PATH_SEPARATOR.to_string(),
                NodeRecord {
                    payload: Vec::new(),
                    stat: NodeStat {
                        czxid: zxid,
                        mzxid: zxid,
                        ctime: now,
                        mtime: now,
                        pzxid: zxid,
                        ..Default::default()
                    },
                    acl: DEFAULT_ACL.clone(),
                    mode: CreateMode::Persistent,
                    children: BTreeSet::new(),
                },
            );
        }
        session
    }

    /// Create `path` (parents included) without firing watches or touching
    /// the call log. Overwrites the payload when the node already exists.
    pub fn seed(
        &self,
        path: &str,
        payload: &[u8],
    ) {
        let mut state = self.state.lock();
        let ancestors = ancestry(path);
        for (index, ancestor) in ancestors.iter().enumerate() {
            let last = index == ancestors.len() - 1;
            if state.nodes.contains_key(ancestor) {
                if last {
                    let node = state.nodes.get_mut(ancestor).unwrap();
                    node.payload = payload.to_vec();
                    node.stat.data_length = payload.len() as i32;
                }
                continue;
            }
            let node_payload = if last { payload.to_vec() } else { Vec::new() };
            insert_node(
                &mut state,
                ancestor,
                node_payload,
                DEFAULT_ACL.clone(),
                CreateMode::Persistent,
            );
        }
    }

    /// Replace the payload of an existing node, firing its data watches.
    pub fn overwrite(
        &self,
        path: &str,
        payload: &[u8],
    ) {
        let notifications = {
            let mut state = self.state.lock();
            let zxid = bump_zxid(&mut state);
            let node = state
                .nodes
                .get_mut(path)
                .expect("node must be seeded before overwrite");
            node.payload = payload.to_vec();
            node.stat.version += 1;
            node.stat.mzxid = zxid;
            node.stat.mtime = now_millis();
            node.stat.data_length = payload.len() as i32;
            take_watchers(
                &mut state,
                vec![WatchEvent {
                    path: path.to_string(),
                    kind: WatchEventKind::DataChanged,
                }],
            )
        };
        dispatch(notifications);
    }

    /// Remove a node (and any descendants), firing its deletion watches and
    /// the parent's children watches.
    pub fn delete(
        &self,
        path: &str,
    ) {
        let notifications = {
            let mut state = self.state.lock();
            let subtree_prefix = format!("{path}{PATH_SEPARATOR}");
            state
                .nodes
                .retain(|key, _| key != path && !key.starts_with(&subtree_prefix));
            let mut events = vec![WatchEvent {
                path: path.to_string(),
                kind: WatchEventKind::NodeDeleted,
            }];
            if let Some(parent) = parent_of(path) {
                let zxid = bump_zxid(&mut state);
                if let Some(parent_node) = state.nodes.get_mut(&parent) {
                    parent_node.children.remove(&leaf_name(path));
                    parent_node.stat.cversion += 1;
                    parent_node.stat.num_children -= 1;
                    parent_node.stat.pzxid = zxid;
                }
                events.push(WatchEvent {
                    path: parent,
                    kind: WatchEventKind::ChildrenChanged,
                });
            }
            take_watchers(&mut state, events)
        };
        dispatch(notifications);
    }

    pub fn has_node(
        &self,
        path: &str,
    ) -> bool {
        self.state.lock().nodes.contains_key(path)
    }

    pub fn payload_of(
        &self,
        path: &str,
    ) -> Option<Vec<u8>> {
        self.state.lock().nodes.get(path).map(|n| n.payload.clone())
    }

    pub fn stat_of(
        &self,
        path: &str,
    ) -> Option<NodeStat> {
        self.state.lock().nodes.get(path).map(|n| n.stat)
    }

    pub fn acl_of(
        &self,
        path: &str,
    ) -> Option<Vec<AclEntry>> {
        self.state.lock().nodes.get(path).map(|n| n.acl.clone())
    }

    pub fn mode_of(
        &self,
        path: &str,
    ) -> Option<CreateMode> {
        self.state.lock().nodes.get(path).map(|n| n.mode)
    }

    /// Kinds of every call issued so far, in order, including failed ones.
    pub fn issued_calls(&self) -> Vec<&'static str> {
        self.state.lock().issued.clone()
    }

    /// Number of live watch channels on `path`.
    pub fn watch_count(
        &self,
        path: &str,
    ) -> usize {
        self.state
            .lock()
            .watches
            .get(path)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreSession for MemorySession {
    fn issue(
        &self,
        call: StoreCall,
        reply: ReplySender,
    ) {
        let (complete, notifications) = {
            let mut state = self.state.lock();
            state.issued.push(call.kind_name());
            let (complete, events) = apply(&mut state, call);
            let notifications = take_watchers(&mut state, events);
            (complete, notifications)
        };
        dispatch(notifications);
        let _ = reply.send(complete);
    }

    fn install_watch(
        &self,
        path: &str,
        _kinds: &[WatchEventKind],
        arm: WatchSender,
    ) {
        self.state
            .lock()
            .watches
            .entry(path.to_string())
            .or_default()
            .push(arm);
    }
}

/// Apply one call to the tree, returning the completion and the watch
/// events the mutation produced.
fn apply(
    state: &mut StoreState,
    call: StoreCall,
) -> (CallComplete, Vec<WatchEvent>) {
    match call {
        StoreCall::SetData {
            path,
            payload,
            expected_version,
        } => {
            let current = match state.nodes.get(&path) {
                None => return (CallComplete::err(StoreCode::NoNode), vec![]),
                Some(node) => node.stat.version,
            };
            if expected_version != ANY_VERSION && expected_version != current {
                return (CallComplete::err(StoreCode::BadVersion), vec![]);
            }
            let zxid = bump_zxid(state);
            let node = state.nodes.get_mut(&path).unwrap();
            node.payload = payload;
            node.stat.version += 1;
            node.stat.mzxid = zxid;
            node.stat.mtime = now_millis();
            node.stat.data_length = node.payload.len() as i32;
            let stat = node.stat;
            (
                CallComplete::ok(CallReply::Stat { stat }),
                vec![WatchEvent {
                    path,
                    kind: WatchEventKind::DataChanged,
                }],
            )
        }

        StoreCall::Create {
            path,
            payload,
            acl,
            mode,
        } => {
            if acl.is_empty() {
                return (CallComplete::err(StoreCode::InvalidAcl), vec![]);
            }
            let parent = match parent_of(&path) {
                None => return (CallComplete::err(StoreCode::NodeExists), vec![]),
                Some(parent) => parent,
            };
            match state.nodes.get(&parent) {
                None => return (CallComplete::err(StoreCode::NoNode), vec![]),
                Some(node) if node.mode.is_ephemeral() => {
                    return (CallComplete::err(StoreCode::NoChildrenForEphemerals), vec![]);
                }
                Some(_) => {}
            }
            let actual_path = if mode.is_sequential() {
                let sequence = state.next_sequence;
                state.next_sequence += 1;
                format!("{path}{sequence:0width$}", width = SEQUENCE_SUFFIX_WIDTH)
            } else {
                path
            };
            if state.nodes.contains_key(&actual_path) {
                return (CallComplete::err(StoreCode::NodeExists), vec![]);
            }
            insert_node(state, &actual_path, payload, acl, mode);
            (
                CallComplete::ok(CallReply::Created {
                    path: actual_path.clone(),
                }),
                vec![
                    WatchEvent {
                        path: actual_path,
                        kind: WatchEventKind::NodeCreated,
                    },
                    WatchEvent {
                        path: parent,
                        kind: WatchEventKind::ChildrenChanged,
                    },
                ],
            )
        }

        StoreCall::GetChildren { path } => match state.nodes.get(&path) {
            None => (CallComplete::err(StoreCode::NoNode), vec![]),
            Some(node) => (
                CallComplete::ok(CallReply::Children {
                    children: node.children.iter().cloned().collect(),
                }),
                vec![],
            ),
        },

        StoreCall::GetData { path } => match state.nodes.get(&path) {
            None => (CallComplete::err(StoreCode::NoNode), vec![]),
            Some(node) => (
                CallComplete::ok(CallReply::Data {
                    payload: node.payload.clone(),
                    stat: node.stat,
                }),
                vec![],
            ),
        },

        StoreCall::Exists { path } => match state.nodes.get(&path) {
            None => (CallComplete::err(StoreCode::NoNode), vec![]),
            Some(node) => (CallComplete::ok(CallReply::Stat { stat: node.stat }), vec![]),
        },
    }
}

/// Insert a node and update the parent's bookkeeping. The caller has
/// already checked that the parent exists and the path is free.
fn insert_node(
    state: &mut StoreState,
    path: &str,
    payload: Vec<u8>,
    acl: Vec<AclEntry>,
    mode: CreateMode,
) {
    let zxid = bump_zxid(state);
    let now = now_millis();
    let stat = NodeStat {
        czxid: zxid,
        mzxid: zxid,
        ctime: now,
        mtime: now,
        ephemeral_owner: if mode.is_ephemeral() { MEMORY_SESSION_ID } else { 0 },
        data_length: payload.len() as i32,
        pzxid: zxid,
        ..Default::default()
    };
    state.nodes.insert(
        path.to_string(),
        NodeRecord {
            payload,
            stat,
            acl,
            mode,
            children: BTreeSet::new(),
        },
    );
    if let Some(parent) = parent_of(path) {
        if let Some(parent_node) = state.nodes.get_mut(&parent) {
            parent_node.children.insert(leaf_name(path));
            parent_node.stat.cversion += 1;
            parent_node.stat.num_children += 1;
            parent_node.stat.pzxid = zxid;
        }
    }
}

/// Remove every watch channel consumed by `events`, pairing each with the
/// event that consumed it. Sends happen outside the state lock.
fn take_watchers(
    state: &mut StoreState,
    events: Vec<WatchEvent>,
) -> Vec<(WatchSender, WatchEvent)> {
    let mut notifications = Vec::new();
    for event in events {
        if let Some(senders) = state.watches.remove(&event.path) {
            for sender in senders {
                notifications.push((sender, event.clone()));
            }
        }
    }
    notifications
}

fn dispatch(notifications: Vec<(WatchSender, WatchEvent)>) {
    for (sender, event) in notifications {
        // Receivers that gave up waiting are allowed to be gone.
        let _ = sender.send(event);
    }
}

fn bump_zxid(state: &mut StoreState) -> i64 {
    state.next_zxid += 1;
    state.next_zxid
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// Every path from the root's first child down to `path` itself.
fn ancestry(path: &str) -> Vec<String> {
    let mut ancestors = Vec::new();
    let mut current = String::new();
    for segment in path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
        current.push(PATH_SEPARATOR);
        current.push_str(segment);
        ancestors.push(current.clone());
    }
    ancestors
}

fn parent_of(path: &str) -> Option<String> {
    let (parent, name) = path.rsplit_once(PATH_SEPARATOR)?;
    if name.is_empty() {
        return None;
    }
    if parent.is_empty() {
        return Some(PATH_SEPARATOR.to_string());
    }
    Some(parent.to_string())
}

fn leaf_name(path: &str) -> String {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestry_walks_down_from_the_root() {
        assert_eq!(ancestry("/a/b/c"), vec!["/a", "/a/b", "/a/b/c"]);
        assert_eq!(ancestry("/a"), vec!["/a"]);
    }

    #[test]
    fn test_parent_resolution() {
        assert_eq!(parent_of("/a/b"), Some("/a".to_string()));
        assert_eq!(parent_of("/a"), Some("/".to_string()));
        assert_eq!(parent_of("/"), None);
    }

    #[test]
    fn test_seed_creates_parents_and_tracks_children() {
        let store = MemorySession::new();
        store.seed("/a/b", b"payload");
        assert!(store.has_node("/a"));
        assert!(store.has_node("/a/b"));
        let parent_stat = store.stat_of("/a").unwrap();
        assert_eq!(parent_stat.num_children, 1);
        assert_eq!(store.payload_of("/a/b").unwrap(), b"payload");
    }

    #[test]
    fn test_delete_updates_parent_bookkeeping() {
        let store = MemorySession::new();
        store.seed("/a/b", b"x");
        store.delete("/a/b");
        assert!(!store.has_node("/a/b"));
        let parent_stat = store.stat_of("/a").unwrap();
        assert_eq!(parent_stat.num_children, 0);
        assert_eq!(parent_stat.cversion, 2);
    }
}
