//! Error codes for the Codeflow diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Header errors
//! - `E1xx` - Statement syntax errors
//! - `E2xx` - Label errors
//! - `E3xx` - Identifier conventions (reported as warnings)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Header Errors (E0xx)
    // =========================================================================
    /// Missing diagram header.
    ///
    /// The first statement must be `graph TD` (optionally followed by `;`).
    E001,

    /// Unsupported diagram direction.
    ///
    /// The header direction must be one of `TD`, `TB`, `BT`, `LR`, `RL`.
    E002,

    // =========================================================================
    // Statement Errors (E1xx)
    // =========================================================================
    /// Unexpected input.
    ///
    /// A statement is neither a node declaration, an edge nor a style
    /// statement.
    E100,

    /// Unterminated label.
    ///
    /// A `[` or `{` opened a label that is never closed on the same statement.
    E101,

    /// Incomplete edge.
    ///
    /// An arrow `-->` is not followed by a target node, or its branch label
    /// `|...|` is not closed.
    E102,

    // =========================================================================
    // Label Errors (E2xx)
    // =========================================================================
    /// Empty label.
    E200,

    /// Disallowed label character.
    ///
    /// Labels may contain only ASCII letters, digits and spaces.
    E201,

    /// Label too long.
    ///
    /// Process labels are limited to 30 characters, decision labels to 20.
    E202,

    /// Irregular label spacing.
    ///
    /// Labels may not start or end with a space or contain repeated spaces.
    E203,

    /// Invalid edge label.
    ///
    /// Branch labels follow the decision label rules.
    E204,

    // =========================================================================
    // Identifier Conventions (E3xx)
    // =========================================================================
    /// Node introduced out of order.
    ///
    /// Identifiers are expected to be introduced in order `A, B, C, ...`.
    E300,

    /// Conflicting node redeclaration.
    ///
    /// A node is declared again with a different label or shape.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "missing diagram header",
            ErrorCode::E002 => "unsupported direction",
            ErrorCode::E100 => "unexpected input",
            ErrorCode::E101 => "unterminated label",
            ErrorCode::E102 => "incomplete edge",
            ErrorCode::E200 => "empty label",
            ErrorCode::E201 => "disallowed label character",
            ErrorCode::E202 => "label too long",
            ErrorCode::E203 => "irregular label spacing",
            ErrorCode::E204 => "invalid edge label",
            ErrorCode::E300 => "node introduced out of order",
            ErrorCode::E301 => "conflicting node redeclaration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E102.to_string(), "E102");
        assert_eq!(ErrorCode::E204.to_string(), "E204");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E101.description(), "unterminated label");
        assert_eq!(ErrorCode::E202.description(), "label too long");
        assert_eq!(ErrorCode::E300.description(), "node introduced out of order");
    }
}
