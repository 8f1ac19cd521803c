//! Wire model for the host-process relay.
//!
//! The host process answers the panel over a single inbound channel with no
//! envelope, no sequence numbers, and no end-of-list marker: zero or more
//! template records interleaved at any time with terminal status flags.
//! Messages are distinguished purely by shape, in a fixed priority order,
//! and shapes that match nothing degrade silently into the template path
//! rather than being rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Bare command token requesting the current template list.
pub const GET_LIBRARY_TEMPLATES: &str = "get-library-templates";

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A template record as sent by the host process. Absent fields default so
/// that malformed records still render instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "DownloadUrl", default)]
    pub download_url: String,
}

/// One inbound message, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    ImportUnauthorized,
    ImportSuccessful,
    Template(TemplateRecord),
}

impl HostMessage {
    /// Classify a raw host message. Dispatch order is fixed: the
    /// unauthorized flag wins over the success flag, and anything else is
    /// treated as a template record with missing fields defaulted.
    pub fn classify(value: Value) -> HostMessage {
        if is_truthy(value.get("templateImportUnauthorized")) {
            return HostMessage::ImportUnauthorized;
        }
        if is_truthy(value.get("templateImportSuccessful")) {
            return HostMessage::ImportSuccessful;
        }
        HostMessage::Template(serde_json::from_value(value).unwrap_or_default())
    }
}

/// Flag test with page-script truthiness: absent, null, false, 0, and the
/// empty string all read as unset.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// One outbound request to the host process.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Ask for the current list of library templates. No parameters and no
    /// correlation id; responses are matched implicitly because only one
    /// list request is ever active at a time.
    GetLibraryTemplates,
    /// Import one template, identified by its download locator.
    ImportTemplate { template_name: String },
}

impl OutboundMessage {
    /// Wire shape: a bare string token for the list request, an object with
    /// a single `templateName` field for imports.
    pub fn to_value(&self) -> Value {
        match self {
            OutboundMessage::GetLibraryTemplates => Value::String(GET_LIBRARY_TEMPLATES.into()),
            OutboundMessage::ImportTemplate { template_name } => {
                serde_json::json!({ "templateName": template_name })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Injected messaging port to the host process. Fire-and-forget: `post`
/// returns nothing, raises nothing, and cannot be cancelled or timed out.
pub trait HostPort {
    fn post(&self, message: &OutboundMessage);
}

/// Port double that records every posted message. Handles are cheap clones
/// of the same capture buffer.
#[derive(Clone, Default)]
pub struct RecordingPort {
    sent: Rc<RefCell<Vec<OutboundMessage>>>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.borrow().clone()
    }
}

impl HostPort for RecordingPort {
    fn post(&self, message: &OutboundMessage) {
        self.sent.borrow_mut().push(message.clone());
    }
}
