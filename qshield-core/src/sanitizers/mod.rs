//! Rule compilation for the redaction engine.
//!
//! `compiler` converts configured pattern rules into case-insensitive
//! regular expressions, dropping the rules that cannot be compiled.

pub mod compiler;
