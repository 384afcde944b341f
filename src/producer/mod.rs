//! Write-path policy: one inbound unit of work, orchestrated end to end.
//!
//! The producer owns every policy decision around the leaf operations it
//! drives: whether the caller is waiting, whether a missing node is created,
//! and what the published reply carries. The operations themselves stay
//! policy-free.

mod context;

pub use context::*;


use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::config::AdapterConfig;
use crate::errors::Result;
use crate::message::InboundMessage;
use crate::message::OutboundReply;
use crate::message::PublicationSink;
use crate::message::ReplyBody;
use crate::operations::CreateOperation;
use crate::operations::GetChildrenOperation;
use crate::operations::OperationResult;
use crate::operations::SetDataOperation;
use crate::session::StoreCode;
use crate::session::StoreSession;

/// Whichever operation ended up answering for the write.
enum WriteOutcome {
    /// The plain write went through (or failed past recovery).
    Written(OperationResult<()>),
    /// The create fallback answered for a missing node.
    Created(OperationResult<String>),
    /// A follow-up listing replaced the write confirmation.
    Listed(OperationResult<Vec<String>>),
}

impl WriteOutcome {
    fn is_ok(&self) -> bool {
        match self {
            WriteOutcome::Written(result) => result.is_ok(),
            WriteOutcome::Created(result) => result.is_ok(),
            WriteOutcome::Listed(result) => result.is_ok(),
        }
    }
}

/// Writes inbound payloads to the store and publishes the outcome.
///
/// Two delivery modes, chosen per message:
///
/// - reply expected: every store call is awaited in order and exactly one
///   reply is published, success or failure;
/// - fire-and-forget: the write (and its possible create fallback) runs in
///   a detached task, outcomes are logged and nothing is published.
///
/// In both modes a write that hits a missing node is recovered at most once,
/// by a single create carrying the same payload, never by retrying the
/// write.
pub struct Producer {
    session: Arc<dyn StoreSession>,
    config: AdapterConfig,
}

impl Producer {
    /// Build a producer over an established session.
    pub fn new(
        session: Arc<dyn StoreSession>,
        config: AdapterConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { session, config })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Process one inbound unit of work.
    ///
    /// # Panics
    ///
    /// Panics when neither the message nor the configuration names a usable
    /// target path.
    pub async fn process(
        &self,
        message: &dyn InboundMessage,
        sink: &dyn PublicationSink,
    ) {
        let context = OperationContext::from_message(message, &self.config.path);

        if message.reply_expected() {
            debug!(path = %context.target_path(), "storing data, waiting for confirmation");
            let mut outcome = self.store_and_confirm(&context).await;

            if self.config.list_children && outcome.is_ok() {
                trace!(path = %context.target_path(), "listing children for the reply");
                outcome = WriteOutcome::Listed(
                    GetChildrenOperation::new(self.session.clone(), context.target_path())
                        .with_timeout(self.config.operation_timeout())
                        .execute()
                        .await,
                );
            }

            sink.publish(assemble_reply(&context, outcome));
        } else {
            self.store_without_confirmation(context);
        }
    }

    /// Write, falling back to a single create when the node is missing and
    /// the configuration allows it.
    async fn store_and_confirm(
        &self,
        context: &OperationContext,
    ) -> WriteOutcome {
        let written =
            write_payload(self.session.clone(), self.config.operation_timeout(), context).await;

        if written.failed_due_to(StoreCode::NoNode) && self.config.create_on_missing {
            warn!(path = %context.target_path(), "node did not exist, creating it");
            return WriteOutcome::Created(
                create_missing_node(self.session.clone(), self.config.operation_timeout(), context)
                    .await,
            );
        }
        WriteOutcome::Written(written)
    }

    /// Hand the write to a detached task and return at once.
    ///
    /// The task owns everything it touches; failures end up in the log, not
    /// at the caller.
    fn store_without_confirmation(
        &self,
        context: OperationContext,
    ) {
        debug!(path = %context.target_path(), "storing data, not waiting for confirmation");
        let session = self.session.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let written =
                write_payload(session.clone(), config.operation_timeout(), &context).await;

            if written.failed_due_to(StoreCode::NoNode) && config.create_on_missing {
                warn!(path = %context.target_path(), "node did not exist, creating it");
                let created =
                    create_missing_node(session, config.operation_timeout(), &context).await;
                match created.error() {
                    None => {
                        debug!(path = %context.target_path(), "created node");
                    }
                    Some(err) => {
                        error!(path = %context.target_path(), error = %err, "creating node failed");
                    }
                }
            } else if let Some(err) = written.error() {
                error!(path = %context.target_path(), error = %err, "storing data failed");
            } else {
                debug!(path = %context.target_path(), "stored data");
                trace!(
                    path = %context.target_path(),
                    statistics = ?written.statistics(),
                    "store statistics"
                );
            }
        });
    }
}

/// The conditional write a unit of work asks for.
async fn write_payload(
    session: Arc<dyn StoreSession>,
    bound: Duration,
    context: &OperationContext,
) -> OperationResult<()> {
    SetDataOperation::new(session, context.target_path(), context.payload().to_vec())
        .with_version(context.expected_version())
        .with_timeout(bound)
        .execute()
        .await
}

/// The create fallback: same payload, access rules and mode taken from the
/// message when it carried them.
async fn create_missing_node(
    session: Arc<dyn StoreSession>,
    bound: Duration,
    context: &OperationContext,
) -> OperationResult<String> {
    let mut create =
        CreateOperation::new(session, context.target_path(), context.payload().to_vec())
            .with_timeout(bound);
    if let Some(acl) = context.acl() {
        create = create.with_acl(acl.to_vec());
    }
    if let Some(mode) = context.create_mode() {
        create = create.with_mode(mode);
    }
    create.execute().await
}

/// Turn whichever result ended up final into the published reply.
fn assemble_reply(
    context: &OperationContext,
    outcome: WriteOutcome,
) -> OutboundReply {
    match outcome {
        WriteOutcome::Written(result) => reply_with(context, result, |_| ReplyBody::Empty),
        WriteOutcome::Created(result) => reply_with(context, result, ReplyBody::NodePath),
        WriteOutcome::Listed(result) => reply_with(context, result, ReplyBody::Children),
    }
}

fn reply_with<T>(
    context: &OperationContext,
    result: OperationResult<T>,
    wrap: impl FnOnce(T) -> ReplyBody,
) -> OutboundReply {
    let (value, statistics, error) = result.into_parts();
    OutboundReply {
        path: context.target_path().to_string(),
        statistics,
        body: match error {
            Some(err) => Err(err),
            None => Ok(value.map(wrap).unwrap_or(ReplyBody::Empty)),
        },
        headers: context.source_headers().clone(),
    }
}
