//! Process-wide shield and the free functions built on it.
//!
//! Prefer building a [`RedactionShield`] once and passing it to callers.
//! The shared instance exists for call sites that cannot be handed one.
//! Replacing it while other threads redact is last-writer-wins.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};

use crate::batch::{redact_attachments_with, BatchRedaction};
use crate::config::PatternRule;
use crate::engine::RedactionShield;
use crate::records::Attachment;

lazy_static! {
    static ref SHIELD_INSTANCE: RwLock<Option<Arc<RedactionShield>>> = RwLock::new(None);
}

/// Returns the shared shield, building it on first use.
///
/// Passing `patterns` always builds a fresh shield and installs it as the
/// shared one.
pub fn get_redaction_shield(patterns: Option<Vec<PatternRule>>) -> Arc<RedactionShield> {
    if patterns.is_none() {
        let guard = SHIELD_INSTANCE.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(shield) = guard.as_ref() {
            return Arc::clone(shield);
        }
    }

    let shield = Arc::new(RedactionShield::new(patterns));
    let mut guard = SHIELD_INSTANCE.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(Arc::clone(&shield));
    shield
}

/// Redacts a query string with the shared shield.
pub fn redact_query(conversation_id: &str, query: Option<&str>) -> Option<String> {
    get_redaction_shield(None).redact_text(query, conversation_id)
}

/// Redacts attachment contents with the shared shield.
///
/// Falls back to the unmodified attachments if redaction fails.
pub fn redact_attachments(conversation_id: &str, attachments: &[Attachment]) -> BatchRedaction<Attachment> {
    let shield = get_redaction_shield(None);
    redact_attachments_with(&*shield, attachments, conversation_id)
}
