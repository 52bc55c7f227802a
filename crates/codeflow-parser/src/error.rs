//! Error and diagnostic system for the Codeflow grammar checker.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from [`parse`](crate::parse).
//!
//! # Example
//!
//! ```
//! # use codeflow_parser::error::{Diagnostic, ErrorCode};
//! # use codeflow_parser::Span;
//!
//! let span = Span::new(12..30);
//! let first = Span::new(0..6);
//!
//! let diag = Diagnostic::warning("node `B` is declared twice with different labels")
//!     .with_code(ErrorCode::E301)
//!     .with_label(span, "redeclared here")
//!     .with_secondary_label(first, "first declared here")
//!     .with_help("declare each node once");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
