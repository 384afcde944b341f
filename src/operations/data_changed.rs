use std::sync::Arc;
use std::time::Duration;

use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::operations::event_driven::EventDrivenOperation;
use crate::operations::GetDataOperation;
use crate::operations::OperationResult;
use crate::operations::WatchState;
use crate::session::StoreSession;
use crate::session::WatchEvent;
use crate::session::WatchEventKind;

const ACCEPTED_KINDS: &[WatchEventKind] = &[
    WatchEventKind::DataChanged,
    WatchEventKind::NodeDeleted,
];

/// Wait for a node's payload to change, optionally reading the new payload.
///
/// One instance delivers one event. To keep watching, ask the delivered
/// instance for [`clone_for_rearm`](DataChangedOperation::clone_for_rearm),
/// which refuses once the node is gone, ending the loop cleanly.
pub struct DataChangedOperation {
    watch: EventDrivenOperation,
    read_changed_data: bool,
    timeout: Duration,
}

impl DataChangedOperation {
    /// New watch on `path`. With `read_changed_data` the delivery includes
    /// the payload as read immediately after the change; without it the
    /// delivery only says that a change happened.
    ///
    /// # Panics
    ///
    /// Panics when `path` is empty or relative.
    pub fn new(
        session: Arc<dyn StoreSession>,
        path: impl Into<String>,
        read_changed_data: bool,
    ) -> Self {
        Self {
            watch: EventDrivenOperation::new(session, path.into(), ACCEPTED_KINDS),
            read_changed_data,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Override the reply bound of the follow-up read. The wait for the
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

    /// Whether the watched relationship has ended (node deleted, or the
    /// wait failed).
    pub fn is_terminal(&self) -> bool {
        self.watch.is_terminal()
    }

    /// Suspend until the node's payload changes or the node is deleted,
    /// then deliver.
    ///
    /// A deletion observed by the follow-up read is delivered as that
    /// read's `NodeMissing` failure.
    pub async fn wait_for_event(&mut self) -> OperationResult<Vec<u8>> {
        let result = match self.watch.await_event().await {
            Ok(_event) => {
                if self.read_changed_data {
                    GetDataOperation::new(self.watch.session().clone(), self.watch.path())
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
            read_changed_data: self.read_changed_data,
            timeout: self.timeout,
        })
    }
}
