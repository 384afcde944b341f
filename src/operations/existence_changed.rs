use std::sync::Arc;

use crate::operations::event_driven::EventDrivenOperation;
use crate::operations::OperationResult;
use crate::operations::WatchState;
use crate::session::StoreSession;
use crate::session::WatchEvent;
use crate::session::WatchEventKind;

const ACCEPTED_KINDS: &[WatchEventKind] = &[
    WatchEventKind::NodeCreated,
    WatchEventKind::NodeDeleted,
];

/// Wait for a node to come into existence or to disappear.
///
/// Delivers the watched path on either transition; the delivered event
/// tells which one happened. Creation leaves the relationship re-armable,
/// deletion ends it.
pub struct ExistenceChangedOperation {
    watch: EventDrivenOperation,
}

impl ExistenceChangedOperation {
    /// # Panics
    ///
    /// Panics when `path` is empty or relative.
    pub fn new(
        session: Arc<dyn StoreSession>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            watch: EventDrivenOperation::new(session, path.into(), ACCEPTED_KINDS),
        }
    }

    pub fn path(&self) -> &str {
        self.watch.path()
    }

    pub fn state(&self) -> WatchState {
        self.watch.state()
    }

    /// The event this instance delivered, once it has.
    pub fn delivered_event(&self) -> Option<&WatchEvent> {
        self.watch.fired()
    }

    /// Whether the watched relationship has ended.
    pub fn is_terminal(&self) -> bool {
        self.watch.is_terminal()
    }

    /// Suspend until the node is created or deleted, then deliver its path.
    pub async fn wait_for_event(&mut self) -> OperationResult<String> {
        let result = match self.watch.await_event().await {
            Ok(_event) => OperationResult::ok(self.watch.path().to_string(), None),
            Err(error) => OperationResult::failed(error),
        };
        self.watch.mark_delivered();
        result
    }

    /// Fresh operation with identical parameters, or `None` once the
    /// watched relationship is terminal.
    pub fn clone_for_rearm(&self) -> Option<Self> {
        if self.watch.is_terminal() {
            return None;
        }
        Some(Self {
            watch: self.watch.rearmed(),
        })
    }
}
