//! Session boundary to the coordination store.
//!
//! The session itself (connecting, authenticating, heartbeating,
//! reconnecting) lives outside this crate. Everything here talks to the
//! store exclusively through [`StoreSession`]: a non-blocking, callback-based
//! surface the operations layer turns back into awaitable futures.

mod call;
mod types;

pub use call::*;
pub use types::*;

// Trait definition of the current module
// -----------------------------------------------------------------------------
// Core seam: the store's asynchronous client API
//

#[cfg(test)]
use mockall::automock;
use tokio::sync::oneshot;

/// Reply channel for one store call. Fulfilled exactly once; a send that
/// fails because the caller gave up waiting must be ignored.
pub type ReplySender = oneshot::Sender<CallComplete>;

/// Delivery channel for one one-shot watch.
pub type WatchSender = oneshot::Sender<WatchEvent>;

/// Handle to an established store session.
///
/// Implementations must be cheap to call from any task and must never block:
/// both methods only hand work to the session's own machinery and return.
/// Completion arrives later through the supplied channel, at most once per
/// channel, from an arbitrary thread.
#[cfg_attr(test, automock)]
pub trait StoreSession: Send + Sync + 'static {
    /// Issue one asynchronous call.
    ///
    /// The session fulfills `reply` with a [`CallComplete`] when the store
    /// answers. Dropping the sender without fulfilling it tells the waiting
    /// operation the connection is gone.
    fn issue(
        &self,
        call: StoreCall,
        reply: ReplySender,
    );

    /// Install a one-shot watch on `path`.
    ///
    /// `kinds` is a hint naming the event kinds the caller is interested in;
    /// sessions are free to deliver any event for the path, and the watch is
    /// consumed by whichever event fires first. Re-arming is the caller's
    /// job, via a fresh channel.
    fn install_watch(
        &self,
        path: &str,
        kinds: &[WatchEventKind],
        arm: WatchSender,
    );
}
