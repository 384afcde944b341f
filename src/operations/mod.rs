//! Store operations with awaitable results.
//!
//! The store's client API is callback-based: a call returns immediately and
//! the outcome arrives later on a thread owned by the session. Every
//! operation here bridges that back into ordinary `async` control flow. It
//! issues exactly one call, parks the task on a oneshot channel the session
//! fulfills, and decodes whatever arrives into a typed [`OperationResult`].
//!
//! No operation retries. A failed attempt is delivered as a value so the
//! caller can decide what a failure means; the write path's create-on-missing
//! fallback is exactly such a decision, made one layer up.

mod children_changed;
mod create;
mod data_changed;
mod event_driven;
mod exists;
mod existence_changed;
mod get_children;
mod get_data;
mod result;
mod set_data;

pub use children_changed::*;
pub use create::*;
pub use data_changed::*;
pub use event_driven::WatchState;
pub use exists::*;
pub use existence_changed::*;
pub use get_children::*;
pub use get_data::*;
pub use result::*;
pub use set_data::*;


// Module level utils
// -----------------------------------------------------------------------------
use std::time::Duration;
use std::time::Instant;

use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;
use tracing::trace;

use crate::constants::ANY_VERSION;
use crate::constants::PATH_SEPARATOR;
use crate::errors::OperationError;
use crate::session::CallReply;
use crate::session::StoreCall;
use crate::session::StoreCode;
use crate::session::StoreSession;

/// Reject paths no store call could address.
///
/// Called from operation constructors; an unusable path is a programming
/// error at the call site, not a runtime store condition.
pub(crate) fn validate_path(path: &str) {
    assert!(!path.is_empty(), "node path must not be empty");
    assert!(
        path.starts_with(PATH_SEPARATOR),
        "node path must be absolute, got '{path}'"
    );
}

/// What the error mapping needs to know about the issued call once the call
/// itself has been moved into the session.
struct CallContext {
    kind: &'static str,
    path: String,
    expected_version: i32,
}

impl CallContext {
    fn of(call: &StoreCall) -> Self {
        Self {
            kind: call.kind_name(),
            path: call.path().to_string(),
            expected_version: match call {
                StoreCall::SetData { expected_version, .. } => *expected_version,
                _ => ANY_VERSION,
            },
        }
    }
}

/// Issue `call` on `session` and suspend until its callback fires or `bound`
/// elapses.
///
/// One call, one reply, no retries. A callback that arrives after the bound
/// elapsed finds the receiving end gone and dies in the session's send.
pub(crate) async fn round_trip(
    session: &dyn StoreSession,
    call: StoreCall,
    bound: Duration,
) -> std::result::Result<CallReply, OperationError> {
    let context = CallContext::of(&call);
    let started = Instant::now();
    let (tx, rx) = oneshot::channel();

    trace!(path = %context.path, call = context.kind, "issuing store call");
    session.issue(call, tx);

    match timeout(bound, rx).await {
        Ok(Ok(complete)) => {
            if complete.code.is_ok() {
                match complete.reply {
                    Some(reply) => {
                        trace!(
                            path = %context.path,
                            call = context.kind,
                            elapsed = ?started.elapsed(),
                            "store call complete"
                        );
                        Ok(reply)
                    }
                    None => Err(OperationError::Decode {
                        detail: format!("{} completed without a reply", context.kind),
                    }),
                }
            } else {
                debug!(
                    path = %context.path,
                    call = context.kind,
                    code = ?complete.code,
                    "store call failed"
                );
                Err(error_for(complete.code, &context))
            }
        }
        Ok(Err(_)) => {
            debug!(path = %context.path, call = context.kind, "session dropped the reply channel");
            Err(OperationError::ConnectionLoss)
        }
        Err(_) => {
            debug!(
                path = %context.path,
                call = context.kind,
                bound = ?bound,
                "no reply within the bound"
            );
            Err(OperationError::Timeout { bound })
        }
    }
}

/// Map a non-ok result code onto the error taxonomy, with call context.
fn error_for(
    code: StoreCode,
    context: &CallContext,
) -> OperationError {
    match code {
        StoreCode::NoNode => OperationError::NodeMissing {
            path: context.path.clone(),
        },
        StoreCode::BadVersion => OperationError::VersionConflict {
            path: context.path.clone(),
            expected: context.expected_version,
        },
        StoreCode::ConnectionLoss => OperationError::ConnectionLoss,
        StoreCode::SessionExpired => OperationError::SessionExpired,
        other => OperationError::Store {
            code: other,
            path: context.path.clone(),
        },
    }
}

/// A reply whose tag does not match the issued call.
pub(crate) fn unexpected_reply(
    kind: &'static str,
    reply: CallReply,
) -> OperationError {
    OperationError::Decode {
        detail: format!("{kind} received a mismatched reply: {reply:?}"),
    }
}
