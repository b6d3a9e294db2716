//! Attachment and message records that pass through the shield.
//!
//! Only the fields redaction touches are modelled. Every record offers a
//! `with_content` copy operation so redaction never mutates its input.

use serde::{Deserialize, Serialize};

/// A document attached to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Kind of attachment, e.g. "log" or "configuration".
    pub attachment_type: String,
    /// MIME type of `content`.
    pub content_type: String,
    pub content: String,
}

impl Attachment {
    pub fn new(
        attachment_type: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            attachment_type: attachment_type.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// A new attachment with the same type fields and `content` replaced.
    pub fn with_content(&self, content: String) -> Self {
        Self {
            attachment_type: self.attachment_type.clone(),
            content_type: self.content_type.clone(),
            content,
        }
    }
}

/// A conversation message exchanged with the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
    System {
        content: Option<String>,
    },
    Tool {
        call_id: String,
        tool_name: String,
        content: Option<String>,
    },
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stop_reason: Option<String>,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User { content: Some(content.into()), context: None }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Message::System { content: Some(content.into()) }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Message::User { content, .. }
            | Message::System { content }
            | Message::Tool { content, .. }
            | Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    /// A copy of this message with `content` replaced. Other fields are kept.
    pub fn with_content(&self, new_content: Option<String>) -> Self {
        let mut copy = self.clone();
        match &mut copy {
            Message::User { content, .. }
            | Message::System { content }
            | Message::Tool { content, .. }
            | Message::Assistant { content, .. } => *content = new_content,
        }
        copy
    }
}
