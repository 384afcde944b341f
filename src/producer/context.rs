use std::collections::HashMap;

use crate::constants::ANY_VERSION;
use crate::message::InboundMessage;
use crate::operations::validate_path;
use crate::session::AclEntry;
use crate::session::CreateMode;

/// Everything one invocation needs, captured from the inbound message
/// before any store call is issued.
///
/// Built once and never mutated. The fire-and-forget path moves it into a
/// detached task, which is why nothing in here borrows from the message.
#[derive(Debug, Clone)]
pub struct OperationContext {
    target_path: String,
    payload: Vec<u8>,
    expected_version: i32,
    source_headers: HashMap<String, String>,
    acl: Option<Vec<AclEntry>>,
    create_mode: Option<CreateMode>,
}

impl OperationContext {
    /// Capture `message`, falling back to `default_path` when the message
    /// names no target.
    ///
    /// # Panics
    ///
    /// Panics when neither the message nor the configuration yields a
    /// usable absolute path.
    pub(crate) fn from_message(
        message: &dyn InboundMessage,
        default_path: &str,
    ) -> Self {
        let target_path = message
            .target_path()
            .unwrap_or_else(|| default_path.to_string());
        validate_path(&target_path);
        Self {
            target_path,
            payload: message.payload(),
            expected_version: message.expected_version().unwrap_or(ANY_VERSION),
            source_headers: message.headers(),
            acl: message.acl(),
            create_mode: message.create_mode(),
        }
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn expected_version(&self) -> i32 {
        self.expected_version
    }

    pub fn source_headers(&self) -> &HashMap<String, String> {
        &self.source_headers
    }

    /// Access rules for a create issued on this invocation's behalf, when
    /// the message carried any.
    pub fn acl(&self) -> Option<&[AclEntry]> {
        self.acl.as_deref()
    }

    /// Creation mode for a create issued on this invocation's behalf, when
    /// the message carried one.
    pub fn create_mode(&self) -> Option<CreateMode> {
        self.create_mode
    }
}
