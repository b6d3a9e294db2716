//! `qshield patterns`: prints the patterns in effect.

use anyhow::Result;
use log::warn;
use std::io::{self, Write};

use qshield_core::{AppConfig, RedactionShield};

use super::build_shield;

/// Writes the shield's pattern list as pretty JSON.
pub fn write_patterns<W: Write>(shield: &RedactionShield, writer: &mut W) -> Result<()> {
    let json = serde_json::to_string_pretty(shield.patterns())?;
    writeln!(writer, "{}", json)?;
    Ok(())
}

pub fn run_patterns(config: Option<&AppConfig>) -> Result<()> {
    let shield = build_shield(config);
    let skipped = shield.compiled_rules().skipped.len();
    if skipped > 0 {
        warn!("{} configured pattern(s) will be skipped", skipped);
    }
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_patterns(&shield, &mut writer)
}
