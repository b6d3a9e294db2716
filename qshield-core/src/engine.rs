// qshield-core/src/engine.rs
//! The redaction engine.
//!
//! [`RedactionShield`] owns an ordered set of compiled rules and applies them
//! one after another to a text. Each rule sees the output of the previous
//! one, so a later rule may match text introduced by an earlier replacement.
//!
//! The [`TextRedactor`] trait is the seam the batch helpers are written
//! against. The shield's implementation never fails; other implementations
//! may, and the batch helpers fall back to the unredacted input when they do.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};

use crate::batch::{redact_messages_with, BatchRedaction};
use crate::config::{configuration, default_patterns, AppConfig, PatternRule};
use crate::errors::ShieldError;
use crate::records::Message;
use crate::resolver::resolve_patterns;
use crate::sanitizers::compiler::{compile_rules, CompiledRule, CompiledRules};

/// A fallible text redaction routine.
pub trait TextRedactor: Send + Sync {
    /// Redacts `text`, returning `None` only when `text` is `None`.
    fn try_redact(&self, text: Option<&str>, conversation_id: &str) -> Result<Option<String>, ShieldError>;
}

/// Applies one rule to `text`, returning the new text and the number of replacements.
fn apply_rule(rule: &CompiledRule, text: &str) -> (String, usize) {
    let matches = rule.regex.find_iter(text).count();
    if matches == 0 {
        return (text.to_string(), 0);
    }
    let replaced = rule.regex.replace_all(text, rule.expansion.as_str());
    (replaced.into_owned(), matches)
}

/// Shield that redacts sensitive information using configurable patterns.
#[derive(Debug)]
pub struct RedactionShield {
    patterns: Vec<PatternRule>,
    compiled: CompiledRules,
}

impl RedactionShield {
    /// Builds a shield from `patterns`.
    ///
    /// Without patterns, the process-wide configuration is consulted and
    /// then the built-in defaults.
    pub fn new(patterns: Option<Vec<PatternRule>>) -> Self {
        Self::build(resolve_patterns(patterns, configuration()))
    }

    /// Builds a shield from `patterns`, falling back to `config` and then to
    /// the built-in defaults.
    pub fn with_config(patterns: Option<Vec<PatternRule>>, config: &AppConfig) -> Self {
        Self::build(resolve_patterns(patterns, Some(config)))
    }

    fn build(patterns: Option<Vec<PatternRule>>) -> Self {
        let patterns = match patterns {
            Some(p) if !p.is_empty() => p,
            _ => default_patterns(),
        };
        let compiled = compile_rules(&patterns);
        info!("Initialized RedactionShield with {} patterns", patterns.len());
        Self { patterns, compiled }
    }

    /// The pattern list this shield was built from, including rejected entries.
    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }

    pub fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled
    }

    /// Redacts sensitive terms in `text`.
    ///
    /// `None` stays `None` and an empty string is returned as is. Rules
    /// rejected at compile time take no part.
    pub fn redact_text(&self, text: Option<&str>, conversation_id: &str) -> Option<String> {
        let text = text?;
        if text.is_empty() {
            return Some(String::new());
        }

        let mut redacted = text.to_string();
        let mut redactions_made = 0;

        for rule in &self.compiled.rules {
            let (next, matches) = apply_rule(rule, &redacted);
            if matches > 0 {
                redacted = next;
                redactions_made += matches;
                debug!(
                    "Applied pattern '{}' to conversation {}: {} matches",
                    rule.original, conversation_id, matches
                );
            }
        }

        if redactions_made > 0 {
            info!(
                "Applied {} redactions for conversation {}",
                redactions_made, conversation_id
            );
        }
        Some(redacted)
    }

    /// Redacts the content of every message, returning copies in input order.
    pub fn redact_messages(&self, messages: &[Message], conversation_id: &str) -> BatchRedaction<Message> {
        redact_messages_with(self, messages, conversation_id)
    }
}

impl Default for RedactionShield {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TextRedactor for RedactionShield {
    fn try_redact(&self, text: Option<&str>, conversation_id: &str) -> Result<Option<String>, ShieldError> {
        Ok(self.redact_text(text, conversation_id))
    }
}
