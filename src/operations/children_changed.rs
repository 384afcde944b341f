use std::sync::Arc;
use std::time::Duration;

use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::operations::event_driven::EventDrivenOperation;
use crate::operations::GetChildrenOperation;
use crate::operations::OperationResult;
use crate::operations::WatchState;
use crate::session::StoreSession;
use crate::session::WatchEvent;
use crate::session::WatchEventKind;

const ACCEPTED_KINDS: &[WatchEventKind] = &[
    WatchEventKind::ChildrenChanged,
    WatchEventKind::NodeDeleted,
];

/// Wait for a node's set of children to change, optionally listing the new
/// children.
///
/// Same delivery contract as [`DataChangedOperation`]: one instance, one
/// event, and [`clone_for_rearm`](ChildrenChangedOperation::clone_for_rearm)
/// to keep watching until the node goes away.
///
/// [`DataChangedOperation`]: crate::operations::DataChangedOperation
pub struct ChildrenChangedOperation {
    watch: EventDrivenOperation,
    list_changed_children: bool,
    timeout: Duration,
}

impl ChildrenChangedOperation {
    /// New watch on `path`. With `list_changed_children` the delivery
    /// includes the child names as listed immediately after the change.
    ///
    /// # Panics
    ///
    /// Panics when `path` is empty or relative.
    pub fn new(
        session: Arc<dyn StoreSession>,
        path: impl Into<String>,
        list_changed_children: bool,
    ) -> Self {
        Self {
            watch: EventDrivenOperation::new(session, path.into(), ACCEPTED_KINDS),
            list_changed_children,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Override the reply bound of the follow-up listing. The wait for the
    /// event itself is unbounded.
    pub fn with_timeout(
        mut self,
        bound: Duration,
    ) -> Self {
        self.timeout = bound;
        self
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

    /// Suspend until the node's children change or the node is deleted,
    /// then deliver.
    pub async fn wait_for_event(&mut self) -> OperationResult<Vec<String>> {
        let result = match self.watch.await_event().await {
            Ok(_event) => {
                if self.list_changed_children {
                    GetChildrenOperation::new(self.watch.session().clone(), self.watch.path())
                        .with_timeout(self.timeout)
                        .execute()
                        .await
                } else {
                    OperationResult::ok_empty(None)
                }
            }
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
            list_changed_children: self.list_changed_children,
            timeout: self.timeout,
        })
    }
}
