// qshield/src/lib.rs
//! # qshield CLI
//!
//! Command-line front end for `qshield-core`: loads the application
//! configuration, builds a `RedactionShield` and redacts a query and its
//! attachments, or prints the patterns in effect.

pub mod cli;
pub mod commands;
pub mod logger;
