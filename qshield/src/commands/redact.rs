//! `qshield redact`: redacts a query and its attachments.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use qshield_core::{redact_attachments_with, AppConfig, Attachment, BatchRedaction, RedactionShield};

use super::build_shield;
use crate::cli::RedactCommand;

/// A redacted query and its attachments, ready to print.
#[derive(Debug)]
pub struct RedactedRequest {
    pub conversation_id: String,
    pub query: String,
    pub attachments: BatchRedaction<Attachment>,
}

/// Redacts `query` and `attachments` with `shield`.
pub fn redact_request(
    shield: &RedactionShield,
    conversation_id: &str,
    query: &str,
    attachments: &[Attachment],
) -> RedactedRequest {
    let query = shield
        .redact_text(Some(query), conversation_id)
        .unwrap_or_default();
    let attachments = redact_attachments_with(shield, attachments, conversation_id);
    RedactedRequest {
        conversation_id: conversation_id.to_string(),
        query,
        attachments,
    }
}

/// Writes the query followed by each attachment under a header line.
pub fn write_request<W: Write>(
    request: &RedactedRequest,
    sources: &[PathBuf],
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "{}", request.query)?;
    for (attachment, source) in request.attachments.items().iter().zip(sources) {
        writeln!(
            writer,
            "--- attachment: {} ({}, {}) ---",
            source.display(),
            attachment.attachment_type,
            attachment.content_type
        )?;
        writeln!(writer, "{}", attachment.content.trim_end_matches('\n'))?;
    }
    Ok(())
}

fn read_query(input_file: Option<&Path>) -> Result<String> {
    let mut query = match input_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read query from stdin")?;
            buf
        }
    };
    let trimmed = query.trim_end_matches(['\r', '\n']).len();
    query.truncate(trimmed);
    Ok(query)
}

pub fn run_redact(cmd: &RedactCommand, config: Option<&AppConfig>) -> Result<()> {
    let query = read_query(cmd.input_file.as_deref())?;
    let attachments = cmd
        .attachments
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read attachment {}", path.display()))
                .map(|content| Attachment::new(&cmd.attachment_type, &cmd.content_type, content))
        })
        .collect::<Result<Vec<_>>>()?;

    let conversation_id = cmd
        .conversation_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!("Redacting request for conversation {}", conversation_id);

    let shield = build_shield(config);
    let request = redact_request(&shield, &conversation_id, &query, &attachments);
    if request.attachments.is_degraded() {
        warn!("Attachments for conversation {} were left unredacted", conversation_id);
    }

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_request(&request, &cmd.attachments, &mut writer)
}
