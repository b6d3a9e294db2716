//! Decides which pattern list a shield is built from.
//!
//! Precedence: an explicit list, then root-level `redaction_patterns`, then
//! `shields.redaction_patterns`. `None` means "use the built-in defaults".
//!
//! License: MIT OR Apache-2.0

use log::{error, info};
use std::path::Path;

use crate::config::{AppConfig, PatternEntry, PatternRule};

fn extract_patterns(source: Option<&Vec<PatternEntry>>) -> Option<Vec<PatternRule>> {
    let entries = source.filter(|e| !e.is_empty())?;
    Some(entries.iter().map(PatternEntry::to_rule).collect())
}

/// Resolves the pattern list from an explicit list or a configuration.
pub fn resolve_patterns(
    explicit: Option<Vec<PatternRule>>,
    config: Option<&AppConfig>,
) -> Option<Vec<PatternRule>> {
    if explicit.is_some() {
        return explicit;
    }
    let config = config?;

    if let Some(patterns) = extract_patterns(config.redaction_patterns.as_ref()) {
        info!("Loaded {} redaction patterns from root config", patterns.len());
        return Some(patterns);
    }

    let nested = config.shields.as_ref().and_then(|s| s.redaction_patterns.as_ref());
    if let Some(patterns) = extract_patterns(nested) {
        info!("Loaded {} redaction patterns from shields config", patterns.len());
        return Some(patterns);
    }

    info!("No redaction patterns found in configuration, using defaults");
    None
}

/// Like [`resolve_patterns`], reading the configuration from `path`.
///
/// A configuration file that cannot be read or parsed is logged and treated
/// as carrying no patterns.
pub fn resolve_patterns_from_file<P: AsRef<Path>>(
    explicit: Option<Vec<PatternRule>>,
    path: P,
) -> Option<Vec<PatternRule>> {
    if explicit.is_some() {
        return explicit;
    }
    match AppConfig::load_from_file(path.as_ref()) {
        Ok(config) => resolve_patterns(None, Some(&config)),
        Err(e) => {
            error!("Error loading redaction patterns from configuration: {:#}", e);
            None
        }
    }
}
