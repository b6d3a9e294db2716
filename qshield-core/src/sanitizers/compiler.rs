//! compiler.rs - Turns pattern rules into case-insensitive matchers.
//!
//! Compilation never fails as a whole. Each rule that is missing a field,
//! is too long, does not parse as a regular expression or whose replacement
//! names a group the pattern lacks is logged and recorded in
//! [`CompiledRules::skipped`]; the remaining rules keep their relative order.
//!
//! Replacements are written with backslash group references (`\1`,
//! `\g<1>`, `\g<name>`). Everything else, `$` included, is literal text.
//! The compiler rewrites each replacement once into the regex crate's
//! expansion syntax and stores it on the rule.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, error};
use regex::{Regex, RegexBuilder};

use crate::config::{PatternRule, MAX_PATTERN_LENGTH};
use crate::errors::ShieldError;

/// Represents a single compiled redaction rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled, case-insensitive regular expression.
    pub regex: Regex,
    /// The replacement as configured.
    pub replacement: String,
    /// `replacement` in the regex crate's expansion syntax.
    pub expansion: String,
    /// The pattern source, kept for logging.
    pub original: String,
}

/// The ordered set of compiled rules plus the rules that were rejected.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    pub skipped: Vec<ShieldError>,
}

impl CompiledRules {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rewrites a backslash-style replacement into the regex crate's `$` syntax.
///
/// Group references are checked against `regex`. `\\`, `\n`, `\t`, `\r`,
/// `\f`, `\v`, `\a`, `\b` and `\0` octal escapes become the characters
/// they name; any other backslash pair is kept as written.
pub fn translate_replacement(pattern: &str, regex: &Regex, replacement: &str) -> Result<String, ShieldError> {
    let bad_group = |group: &str| ShieldError::InvalidGroupReference {
        pattern: pattern.to_string(),
        group: group.to_string(),
    };
    let mut expansion = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => expansion.push_str("$$"),
            '\\' => match chars.next() {
                None => expansion.push('\\'),
                Some('g') => {
                    if chars.next_if_eq(&'<').is_none() {
                        return Err(bad_group("g"));
                    }
                    let mut group = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => group.push(ch),
                            None => return Err(bad_group(&group)),
                        }
                    }
                    let known = match group.parse::<usize>() {
                        Ok(index) => index < regex.captures_len(),
                        Err(_) => !group.is_empty() && regex.capture_names().flatten().any(|name| name == group),
                    };
                    if !known {
                        return Err(bad_group(&group));
                    }
                    expansion.push_str(&format!("${{{}}}", group));
                }
                Some('0') => {
                    let mut code = 0u8;
                    for _ in 0..2 {
                        match chars.next_if(|ch| ('0'..='7').contains(ch)) {
                            Some(d) => code = code * 8 + (d as u8 - b'0'),
                            None => break,
                        }
                    }
                    match char::from(code) {
                        '$' => expansion.push_str("$$"),
                        ch => expansion.push(ch),
                    }
                }
                Some(d @ '1'..='9') => {
                    let mut group = d.to_string();
                    if let Some(next) = chars.next_if(|ch| ch.is_ascii_digit()) {
                        group.push(next);
                    }
                    let index: usize = group.parse().map_err(|_| bad_group(&group))?;
                    if index >= regex.captures_len() {
                        return Err(bad_group(&group));
                    }
                    expansion.push_str(&format!("${{{}}}", index));
                }
                Some('\\') => expansion.push('\\'),
                Some('n') => expansion.push('\n'),
                Some('t') => expansion.push('\t'),
                Some('r') => expansion.push('\r'),
                Some('f') => expansion.push('\x0c'),
                Some('v') => expansion.push('\x0b'),
                Some('a') => expansion.push('\x07'),
                Some('b') => expansion.push('\x08'),
                Some('$') => {
                    expansion.push('\\');
                    expansion.push_str("$$");
                }
                Some(other) => {
                    expansion.push('\\');
                    expansion.push(other);
                }
            },
            other => expansion.push(other),
        }
    }
    Ok(expansion)
}

fn compile_rule(rule: &PatternRule) -> Result<CompiledRule, ShieldError> {
    let pattern = rule.pattern.as_ref().ok_or(ShieldError::MissingField("pattern"))?;
    let replacement = rule
        .replacement
        .as_ref()
        .ok_or(ShieldError::MissingField("replacement"))?;

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ShieldError::PatternLengthExceeded(
            pattern.clone(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| ShieldError::RuleCompilationError(pattern.clone(), e))?;

    let expansion = translate_replacement(pattern, &regex, replacement)?;

    Ok(CompiledRule {
        regex,
        replacement: replacement.clone(),
        expansion,
        original: pattern.clone(),
    })
}

/// Compiles `rules` in order, skipping the ones that cannot be compiled.
pub fn compile_rules(rules: &[PatternRule]) -> CompiledRules {
    debug!("Starting compilation of {} rules.", rules.len());

    let mut compiled = CompiledRules::default();
    for rule in rules {
        match compile_rule(rule) {
            Ok(c) => {
                debug!("Compiled pattern: {} -> {}", c.original, c.replacement);
                compiled.rules.push(c);
            }
            Err(e) => {
                error!("Invalid pattern configuration: {:?}, error: {}", rule, e);
                compiled.skipped.push(e);
            }
        }
    }

    debug!(
        "Finished compiling rules. Total compiled: {}, skipped: {}.",
        compiled.rules.len(),
        compiled.skipped.len()
    );
    compiled
}
