// qshield-core/src/lib.rs
//! # qshield Core Library
//!
//! `qshield-core` redacts sensitive terms from queries, attachments and
//! messages exchanged with a Llama Stack backend. Redaction is driven by an
//! ordered list of `{pattern, replacement}` rules compiled into
//! case-insensitive regular expressions and applied one after another.
//!
//! ## Modules
//!
//! * `config`: Pattern records, the YAML application configuration and the built-in defaults.
//! * `resolver`: Chooses between explicit, configured and default patterns.
//! * `sanitizers`: Compiles pattern rules, skipping the ones that are invalid.
//! * `engine`: The `RedactionShield` and the `TextRedactor` trait.
//! * `records`: `Attachment` and `Message` records.
//! * `batch`: Fail-open redaction of attachment and message lists.
//! * `shared`: The process-wide shield plus `redact_query` / `redact_attachments`.
//! * `client`: Llama Stack client selection and the redacting client wrapper.
//!
//! ## Usage Example
//!
//! ```rust
//! use qshield_core::{Attachment, PatternRule, RedactionShield, redact_attachments_with};
//!
//! let shield = RedactionShield::new(Some(vec![
//!     PatternRule::new(r"\bpassword\b", "[REDACTED]"),
//! ]));
//!
//! let query = shield.redact_text(Some("reset the PASSWORD"), "conv-1");
//! assert_eq!(query.as_deref(), Some("reset the [REDACTED]"));
//!
//! let attachments = vec![Attachment::new("log", "text/plain", "password=hunter2")];
//! let outcome = redact_attachments_with(&shield, &attachments, "conv-1");
//! assert!(!outcome.is_degraded());
//! ```
//!
//! ## Error Handling
//!
//! Bad patterns, unreadable configuration and failed batches are logged and
//! absorbed. `ShieldError` is returned only where there is no safe fallback,
//! such as a library-mode client without a configuration path.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod batch;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod records;
pub mod resolver;
pub mod sanitizers;
pub mod shared;

pub use config::{
    configuration,
    default_patterns,
    install_configuration,
    AppConfig,
    LlamaStackConfig,
    PatternEntry,
    PatternRule,
    ShieldsConfig,
    MAX_PATTERN_LENGTH,
};

pub use errors::ShieldError;

pub use engine::{RedactionShield, TextRedactor};

pub use records::{Attachment, Message};

pub use batch::{redact_attachments_with, redact_messages_with, BatchRedaction};

pub use resolver::{resolve_patterns, resolve_patterns_from_file};

pub use shared::{get_redaction_shield, redact_attachments, redact_query};

pub use client::{
    get_llama_stack_client,
    LibraryClient,
    Model,
    RedactionEnabledClient,
    ServiceClient,
    StackClient,
    DEFAULT_LLAMA_STACK_URL,
};

pub use sanitizers::compiler::{compile_rules, CompiledRule, CompiledRules};
