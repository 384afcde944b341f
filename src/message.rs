//! Message boundary to the surrounding pipeline.
//!
//! The pipeline's message model stays outside this crate. The producer sees
//! inbound work through [`InboundMessage`], a read-only view it consults
//! exactly once up front, and publishes outcomes through [`PublicationSink`].
//! Nothing here assumes any particular messaging framework.

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

use crate::errors::OperationError;
use crate::session::AclEntry;
use crate::session::CreateMode;
use crate::session::NodeStat;

/// Read-only view of one inbound unit of work.
///
/// The producer copies everything it needs out of the message before
/// issuing any store call, so implementations are never called again once
/// processing has started.
#[cfg_attr(test, automock)]
pub trait InboundMessage: Send + Sync {
    /// Target node path. The configured default path applies when `None`.
    fn target_path(&self) -> Option<String>;

    /// Payload bytes to write.
    fn payload(&self) -> Vec<u8>;

    /// Version the write is conditional on.
    /// [`ANY_VERSION`](crate::ANY_VERSION) applies when `None`.
    fn expected_version(&self) -> Option<i32>;

    /// Access rules for nodes created on this message's behalf. The open
    /// default applies when `None`.
    fn acl(&self) -> Option<Vec<AclEntry>>;

    /// Creation mode for nodes created on this message's behalf. Ephemeral
    /// applies when `None`.
    fn create_mode(&self) -> Option<CreateMode>;

    /// Whether the caller waits for a reply. Without one, processing is
    /// fire-and-forget: outcomes are logged, never published.
    fn reply_expected(&self) -> bool;

    /// Metadata copied onto the outbound reply untouched.
    fn headers(&self) -> HashMap<String, String>;
}

/// Body of an outbound reply, tagged by what the final operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// The final operation produced no payload (a plain write).
    Empty,
    /// Raw node payload.
    Data(Vec<u8>),
    /// Path of a created node.
    NodePath(String),
    /// Child names.
    Children(Vec<String>),
}

/// Reply published for one processed unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundReply {
    /// Node the processing targeted.
    pub path: String,
    /// Statistics reported by the store, when the final operation carried
    /// them.
    pub statistics: Option<NodeStat>,
    /// Decoded body on success, the structured failure otherwise.
    pub body: std::result::Result<ReplyBody, OperationError>,
    /// Metadata copied from the inbound message.
    pub headers: HashMap<String, String>,
}

impl OutboundReply {
    pub fn is_ok(&self) -> bool {
        self.body.is_ok()
    }
}

/// Where finished replies go.
#[cfg_attr(test, automock)]
pub trait PublicationSink: Send + Sync {
    /// Publish the reply for one unit of work.
    fn publish(
        &self,
        reply: OutboundReply,
    );
}
