//! Error types for Codeflow operations.
//!
//! This module provides the main error type [`CodeflowError`]. Failures of
//! the model, of reply decoding and of the grammar check on model output are
//! never surfaced through it: the analyzer turns them into an offline
//! analysis instead.

use std::io;

use thiserror::Error;

use codeflow_parser::error::ParseError;

/// The main error type for Codeflow operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the checked diagram text next to the
/// diagnostics so callers can render labelled source snippets.
#[derive(Debug, Error)]
pub enum CodeflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("no source code provided")]
    EmptySource,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(#[from] serde_json::Error),
}

impl CodeflowError {
    /// Create a new `Parse` error with the associated diagram text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
