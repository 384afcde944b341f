use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;
use tracing::trace;

use crate::errors::OperationError;
use crate::operations::validate_path;
use crate::session::StoreSession;
use crate::session::WatchEvent;
use crate::session::WatchEventKind;

/// Lifecycle of one watch-driven operation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No watch installed yet.
    Idle,
    /// A one-shot watch is installed; waiting for the store to fire it.
    Armed,
    /// An accepted event arrived; the result is being assembled.
    Fired,
    /// The result left for the caller. The instance is spent.
    Delivered,
}

/// Engine shared by the watch-driven operations.
///
/// The store's watches are one-shot: the first event for the path consumes
/// the watch, whatever its kind. This engine hides that by re-installing the
/// watch whenever an event of an unaccepted kind burned it, so callers only
/// ever observe the kinds their operation subscribed to.
///
/// A watched relationship ends (becomes terminal) when the node is deleted
/// or when a wait fails outright. Terminal engines refuse to produce a
/// re-armed copy.
pub(crate) struct EventDrivenOperation {
    session: Arc<dyn StoreSession>,
    path: String,
    accepted: &'static [WatchEventKind],
    state: WatchState,
    fired: Option<WatchEvent>,
}

impl EventDrivenOperation {
    pub(crate) fn new(
        session: Arc<dyn StoreSession>,
        path: String,
        accepted: &'static [WatchEventKind],
    ) -> Self {
        validate_path(&path);
        Self {
            session,
            path,
            accepted,
            state: WatchState::Idle,
            fired: None,
        }
    }

    pub(crate) fn session(&self) -> &Arc<dyn StoreSession> {
        &self.session
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn state(&self) -> WatchState {
        self.state
    }

    /// The accepted event that was delivered, once there is one.
    pub(crate) fn fired(&self) -> Option<&WatchEvent> {
        self.fired.as_ref()
    }

    /// Whether the watched relationship has ended.
    ///
    /// Deletion of the node is always terminal. So is a delivery that never
    /// saw an event because the wait itself failed.
    pub(crate) fn is_terminal(&self) -> bool {
        match self.state {
            WatchState::Delivered => self
                .fired
                .as_ref()
                .map_or(true, |event| event.kind == WatchEventKind::NodeDeleted),
            _ => false,
        }
    }

    /// Fresh engine with identical construction parameters and no history.
    pub(crate) fn rearmed(&self) -> Self {
        Self {
            session: self.session.clone(),
            path: self.path.clone(),
            accepted: self.accepted,
            state: WatchState::Idle,
            fired: None,
        }
    }

    /// Install the watch and suspend until the next accepted event.
    ///
    /// Events of unaccepted kinds consume the store's watch without waking
    /// the caller; the engine re-installs and keeps waiting, so consecutive
    /// accepted events are observed in store-delivery order. The wait is
    /// unbounded: a watch that never fires is not an error.
    ///
    /// A delivered instance is spent: further calls fail with
    /// [`WatchSpent`](OperationError::WatchSpent) without installing
    /// anything, keeping the recorded event and the terminality verdict
    /// frozen.
    pub(crate) async fn await_event(&mut self) -> std::result::Result<WatchEvent, OperationError> {
        if self.state == WatchState::Delivered {
            debug!(path = %self.path, "spent watch instance asked to wait again");
            return Err(OperationError::WatchSpent {
                path: self.path.clone(),
            });
        }
        loop {
            let (tx, rx) = oneshot::channel();
            self.state = WatchState::Armed;
            trace!(path = %self.path, kinds = ?self.accepted, "watch installed");
            self.session.install_watch(&self.path, self.accepted, tx);

            match rx.await {
                Ok(event) if self.accepted.contains(&event.kind) => {
                    debug!(path = %self.path, kind = ?event.kind, "watch fired");
                    self.state = WatchState::Fired;
                    self.fired = Some(event.clone());
                    return Ok(event);
                }
                Ok(event) => {
                    trace!(
                        path = %self.path,
                        kind = ?event.kind,
                        "unaccepted event consumed the watch, re-installing"
                    );
                }
                Err(_) => {
                    debug!(path = %self.path, "watch channel closed before any event");
                    self.state = WatchState::Delivered;
                    return Err(OperationError::ConnectionLoss);
                }
            }
        }
    }

    /// Mark the result as handed to the caller.
    pub(crate) fn mark_delivered(&mut self) {
        self.state = WatchState::Delivered;
    }
}
