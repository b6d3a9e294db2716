//! This file defines the command-line interface (CLI) for the qshield
//! application, including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "qshield",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact queries and attachments before they reach a Llama Stack backend",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to the application configuration file (YAML).
    #[arg(
        long = "config",
        value_name = "FILE",
        env = "QSHIELD_CONFIG",
        global = true,
        help = "Path to the application configuration file (YAML). Defaults to <config dir>/qshield/config.yaml."
    )]
    pub config: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `qshield` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts a query (file or stdin) and any attachments.
    #[command(about = "Redacts a query read from a file or stdin, plus any attachment files.")]
    Redact(RedactCommand),

    /// Prints the pattern list the shield would use.
    #[command(about = "Prints the resolved redaction patterns as JSON.")]
    Patterns,
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    /// Path to the query (reads from stdin if not provided).
    #[arg(long = "input", short = 'i', alias = "input-file", value_name = "FILE", help = "Read the query from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Files sent along with the query as attachments.
    #[arg(long = "attachment", short = 'a', value_name = "FILE", help = "Attach a file; its content is redacted too. May be repeated.")]
    pub attachments: Vec<PathBuf>,

    /// Attachment type recorded for every attachment.
    #[arg(long = "attachment-type", value_name = "TYPE", default_value = "log", help = "Attachment type for attached files.")]
    pub attachment_type: String,

    /// Content type recorded for every attachment.
    #[arg(long = "content-type", value_name = "MIME", default_value = "text/plain", help = "Content type for attached files.")]
    pub content_type: String,

    /// Conversation identifier used in log lines.
    #[arg(long = "conversation-id", value_name = "ID", help = "Conversation identifier for log lines (a random UUID if omitted).")]
    pub conversation_id: Option<String>,
}
