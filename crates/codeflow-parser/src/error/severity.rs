//! Severity levels for diagnostics.

use std::fmt;

/// How seriously a diagnostic affects a diagram.
///
/// - [`Severity::Error`]: the diagram breaks the output grammar and must not
///   reach a renderer.
/// - [`Severity::Warning`]: the diagram renders, but deviates from the
///   conventions generated diagrams follow (for example id ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Grammar violation.
    Error,

    /// Convention violation.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}
