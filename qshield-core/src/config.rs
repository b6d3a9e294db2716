//! Configuration management for `qshield-core`.
//!
//! This module defines the redaction pattern records and the slice of the
//! application configuration the shield reads: root-level
//! `redaction_patterns`, the nested `shields.redaction_patterns` section and
//! the `llama_stack` client section. It handles YAML deserialization, a
//! load-time validation pass, the built-in default patterns and the
//! process-wide configuration slot installed at start-up.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sanitizers::compiler::translate_replacement;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single `{pattern, replacement}` rule.
///
/// Both fields are optional so that incomplete entries survive
/// deserialization; the compiler rejects them later with a logged error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternRule {
    /// Regular expression source, compiled case-insensitively.
    pub pattern: Option<String>,
    /// Text substituted for every match. Supports `\1` / `\g<name>` group references; `$` is literal.
    pub replacement: Option<String>,
}

impl PatternRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            replacement: Some(replacement.into()),
        }
    }
}

/// A pattern entry as it appears in a configuration file.
///
/// Entries are either plain `{pattern, replacement}` records or named
/// records carrying extra metadata. Only `pattern` and `replacement` are
/// used for redaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PatternEntry {
    Named {
        name: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        replacement: Option<String>,
    },
    Plain(PatternRule),
}

impl PatternEntry {
    /// Extracts the plain rule from this entry.
    pub fn to_rule(&self) -> PatternRule {
        match self {
            PatternEntry::Named { pattern, replacement, .. } => PatternRule {
                pattern: pattern.clone(),
                replacement: replacement.clone(),
            },
            PatternEntry::Plain(rule) => rule.clone(),
        }
    }
}

impl From<PatternRule> for PatternEntry {
    fn from(rule: PatternRule) -> Self {
        PatternEntry::Plain(rule)
    }
}

/// The nested `shields` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShieldsConfig {
    pub redaction_patterns: Option<Vec<PatternEntry>>,
}

/// Settings used to build the Llama Stack client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlamaStackConfig {
    /// Base URL of a Llama Stack service.
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Run the stack in-process instead of talking to a service.
    pub use_as_library_client: Option<bool>,
    /// Run configuration for library mode. Required when `use_as_library_client` is set.
    pub library_client_config_path: Option<PathBuf>,
}

/// The parts of the application configuration qshield understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root-level patterns. Take precedence over `shields.redaction_patterns`.
    pub redaction_patterns: Option<Vec<PatternEntry>>,
    pub shields: Option<ShieldsConfig>,
    pub llama_stack: Option<LlamaStackConfig>,
}

static CONFIGURATION: OnceCell<AppConfig> = OnceCell::new();

/// Installs the process-wide configuration. Only the first call succeeds;
/// later calls hand the rejected configuration back.
pub fn install_configuration(config: AppConfig) -> std::result::Result<(), AppConfig> {
    CONFIGURATION.set(config)
}

/// The process-wide configuration, if one was installed.
pub fn configuration() -> Option<&'static AppConfig> {
    CONFIGURATION.get()
}

impl AppConfig {
    /// Loads the configuration from a YAML file.
    ///
    /// Patterns that will not compile are reported as warnings but do not
    /// fail the load; the compiler skips them later.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        for problem in config.validate() {
            warn!("{}: {}", path.display(), problem);
        }
        Ok(config)
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: AppConfig = serde_yml::from_str(text)?;
        debug!(
            "Parsed configuration: {} root patterns, {} shields patterns.",
            config.redaction_patterns.as_ref().map_or(0, Vec::len),
            config
                .shields
                .as_ref()
                .and_then(|s| s.redaction_patterns.as_ref())
                .map_or(0, Vec::len)
        );
        Ok(config)
    }

    /// Returns a description of every pattern entry that will be rejected
    /// at compile time.
    pub fn validate(&self) -> Vec<String> {
        let root = self
            .redaction_patterns
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, e)| ("redaction_patterns", i, e));
        let nested = self
            .shields
            .iter()
            .filter_map(|s| s.redaction_patterns.as_ref())
            .flatten()
            .enumerate()
            .map(|(i, e)| ("shields.redaction_patterns", i, e));

        let mut problems = Vec::new();
        for (section, index, entry) in root.chain(nested) {
            let rule = entry.to_rule();
            match (&rule.pattern, &rule.replacement) {
                (None, _) => problems.push(format!("{} entry #{} has no `pattern`", section, index)),
                (_, None) => problems.push(format!("{} entry #{} has no `replacement`", section, index)),
                (Some(p), Some(_)) if p.len() > MAX_PATTERN_LENGTH => problems.push(format!(
                    "{} entry #{} pattern exceeds {} characters",
                    section, index, MAX_PATTERN_LENGTH
                )),
                (Some(p), Some(r)) => match RegexBuilder::new(p).case_insensitive(true).build() {
                    Err(e) => problems.push(format!("{} entry #{} has an invalid pattern: {}", section, index, e)),
                    Ok(regex) => {
                        if let Err(e) = translate_replacement(p, &regex, r) {
                            problems.push(format!("{} entry #{} has an invalid replacement: {}", section, index, e));
                        }
                    }
                },
            }
        }
        problems
    }
}

/// Fallback redaction patterns used when none are configured.
pub fn default_patterns() -> Vec<PatternRule> {
    vec![
        PatternRule::new(r"\bfoo\b", "deployment"),
        PatternRule::new(r"\bbar\b", "openshift"),
        PatternRule::new(r"\bpassword\b", "[REDACTED]"),
        PatternRule::new(r"\bsecret\b", "[REDACTED]"),
        PatternRule::new(r"\bapi[_-]?key\b", "[REDACTED]"),
        PatternRule::new(r"\btoken\b", "[REDACTED]"),
    ]
}
