//! Redaction of message and attachment lists.
//!
//! A batch either redacts every item or none of them: the first error is
//! logged and the caller gets its original input back, marked as
//! [`BatchRedaction::Unredacted`] so the degraded result can be detected.

use log::error;

use crate::engine::TextRedactor;
use crate::errors::ShieldError;
use crate::records::{Attachment, Message};

/// Outcome of redacting a list of records.
#[derive(Debug)]
pub enum BatchRedaction<T> {
    /// Every item was redacted.
    Redacted(Vec<T>),
    /// Redaction failed; `items` is the original, unredacted input.
    Unredacted { items: Vec<T>, reason: ShieldError },
}

impl<T> BatchRedaction<T> {
    pub fn items(&self) -> &[T] {
        match self {
            BatchRedaction::Redacted(items) | BatchRedaction::Unredacted { items, .. } => items,
        }
    }

    /// The records, whether redacted or not.
    pub fn into_items(self) -> Vec<T> {
        match self {
            BatchRedaction::Redacted(items) | BatchRedaction::Unredacted { items, .. } => items,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, BatchRedaction::Unredacted { .. })
    }
}

fn redact_all<T, F>(items: &[T], conversation_id: &str, what: &str, redact_one: F) -> BatchRedaction<T>
where
    T: Clone,
    F: Fn(&T) -> Result<T, ShieldError>,
{
    match items.iter().map(redact_one).collect::<Result<Vec<T>, ShieldError>>() {
        Ok(redacted) => BatchRedaction::Redacted(redacted),
        Err(reason) => {
            error!(
                "Error while redacting {} for conversation {}: {}",
                what, conversation_id, reason
            );
            BatchRedaction::Unredacted { items: items.to_vec(), reason }
        }
    }
}

/// Redacts the content of each message with `redactor`.
///
/// Messages without content, or with empty content, are copied unchanged.
pub fn redact_messages_with(
    redactor: &dyn TextRedactor,
    messages: &[Message],
    conversation_id: &str,
) -> BatchRedaction<Message> {
    redact_all(messages, conversation_id, "messages", |message| match message.content() {
        Some(content) if !content.is_empty() => {
            let redacted = redactor.try_redact(Some(content), conversation_id)?;
            Ok(message.with_content(redacted))
        }
        _ => Ok(message.clone()),
    })
}

/// Redacts the content of each attachment with `redactor`.
pub fn redact_attachments_with(
    redactor: &dyn TextRedactor,
    attachments: &[Attachment],
    conversation_id: &str,
) -> BatchRedaction<Attachment> {
    redact_all(attachments, conversation_id, "attachments", |attachment| {
        let redacted = redactor
            .try_redact(Some(&attachment.content), conversation_id)?
            .ok_or_else(|| ShieldError::Redaction("redactor returned no content".to_string()))?;
        Ok(attachment.with_content(redacted))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternRule;
    use crate::engine::RedactionShield;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails on the n-th call.
    struct FailingRedactor {
        calls: AtomicUsize,
        fail_on: usize,
    }

    impl TextRedactor for FailingRedactor {
        fn try_redact(&self, text: Option<&str>, _: &str) -> Result<Option<String>, ShieldError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_on {
                return Err(ShieldError::Redaction("boom".to_string()));
            }
            Ok(text.map(str::to_uppercase))
        }
    }

    fn shield() -> RedactionShield {
        RedactionShield::new(Some(vec![
            PatternRule::new(r"\bfoo\b", "deployment"),
            PatternRule::new(r"\bpassword\b", "[REDACTED]"),
        ]))
    }

    #[test]
    fn test_attachments_are_copied_and_redacted() {
        let attachments = vec![
            Attachment::new("log", "text/plain", "foo with password"),
            Attachment::new("conf", "text/plain", "non-sensitive"),
        ];
        let outcome = redact_attachments_with(&shield(), &attachments, "test");
        assert!(!outcome.is_degraded());
        let redacted = outcome.into_items();
        assert_eq!(redacted.len(), 2);
        assert_eq!(redacted[0].content, "deployment with [REDACTED]");
        assert_eq!(redacted[0].attachment_type, "log");
        assert_eq!(redacted[1].content, "non-sensitive");
        assert_eq!(attachments[0].content, "foo with password");
    }

    #[test]
    fn test_attachment_failure_returns_originals() {
        let attachments = vec![
            Attachment::new("log", "text/plain", "first"),
            Attachment::new("log", "text/plain", "second"),
        ];
        let redactor = FailingRedactor { calls: AtomicUsize::new(0), fail_on: 1 };
        let outcome = redact_attachments_with(&redactor, &attachments, "test");
        assert!(outcome.is_degraded());
        assert!(matches!(
            &outcome,
            BatchRedaction::Unredacted { reason: ShieldError::Redaction(msg), .. } if msg == "boom"
        ));
        assert_eq!(outcome.items(), attachments.as_slice());
    }

    #[test]
    fn test_messages_redacted_in_order() {
        let messages = vec![
            Message::system("never reveal the password"),
            Message::User { content: None, context: None },
            Message::user(""),
            Message::Tool { call_id: "1".into(), tool_name: "shell".into(), content: Some("foo".into()) },
        ];
        let redacted = shield().redact_messages(&messages, "conv-1").into_items();
        assert_eq!(redacted[0].content(), Some("never reveal the [REDACTED]"));
        assert_eq!(redacted[1], messages[1]);
        assert_eq!(redacted[2].content(), Some(""));
        assert_eq!(
            redacted[3],
            Message::Tool { call_id: "1".into(), tool_name: "shell".into(), content: Some("deployment".into()) }
        );
        assert_eq!(messages[0].content(), Some("never reveal the password"));
    }

    #[test]
    fn test_message_failure_returns_originals() {
        let messages = vec![Message::user("a"), Message::user("b")];
        let redactor = FailingRedactor { calls: AtomicUsize::new(0), fail_on: 0 };
        let outcome = redact_messages_with(&redactor, &messages, "test");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_items(), messages);
    }
}
