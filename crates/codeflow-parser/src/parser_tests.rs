//! Unit tests for the full checking pipeline.
//!
//! These tests drive `check` over whole diagrams and assert on the codes,
//! severities and spans of the diagnostics produced.

use crate::{
    Span, check,
    error::{Diagnostic, ErrorCode, Severity},
};

/// Helper function to check a diagram and return its error codes
fn error_codes(source: &str) -> Vec<ErrorCode> {
    match check(source) {
        Ok(_) => Vec::new(),
        Err(err) => err.errors().filter_map(Diagnostic::code).collect(),
    }
}

/// Helper function to check a diagram and assert success
fn assert_checks_successfully(source: &str) -> Vec<Diagnostic> {
    match check(source) {
        Ok(checked) => checked.warnings().to_vec(),
        Err(e) => panic!("Expected check to succeed, but got error: {}", e),
    }
}

/// Helper function to check a diagram and assert a single error code
fn assert_fails_with(source: &str, expected: ErrorCode) {
    let codes = error_codes(source);
    assert!(
        codes.contains(&expected),
        "Expected {expected} for {source:?}, got {codes:?}"
    );
}

#[test]
fn test_accepts_reference_diagram() {
    let source = "graph TD;\n    A[Start] --> B[Initialize]\n    B --> C{Check condition}\n    C -->|Yes| D[Process data]\n    C -->|No| E[Skip processing]\n    D --> F[Update result]\n    E --> F\n    F --> G[End]";
    let warnings = assert_checks_successfully(source);
    assert!(warnings.is_empty());
}

#[test]
fn test_accepts_semicolon_separated_statements() {
    assert_checks_successfully("graph TD; A[Start] --> B[End]; B --> C{Done}");
}

#[test]
fn test_accepts_extensions() {
    let source = "flowchart LR\n%% generated offline\nA[Start] --> B[End]\nclassDef startEnd fill:#e1f5fe\nclass A,B startEnd";
    let warnings = assert_checks_successfully(source);
    assert!(warnings.is_empty());
}

#[test]
fn test_missing_header() {
    assert_fails_with("A[Start] --> B[End]", ErrorCode::E001);
    assert_fails_with("", ErrorCode::E001);
    assert_fails_with("  \n\n ", ErrorCode::E001);
}

#[test]
fn test_missing_header_still_checks_first_statement() {
    let codes = error_codes("A[x = 1] --> B[End]");
    assert_eq!(codes, vec![ErrorCode::E001, ErrorCode::E201]);
}

#[test]
fn test_unknown_direction() {
    assert_fails_with("graph XY\nA[Start] --> B[End]", ErrorCode::E002);
}

#[test]
fn test_label_errors() {
    assert_fails_with("graph TD\nA[]", ErrorCode::E200);
    assert_fails_with("graph TD\nA[x = 1]", ErrorCode::E201);
    assert_fails_with("graph TD\nA[Check  twice]", ErrorCode::E203);
    assert_fails_with(
        "graph TD\nA[This label is far longer than thirty chars]",
        ErrorCode::E202,
    );
    assert_fails_with("graph TD\nA{Decision label too long}", ErrorCode::E202);
}

#[test]
fn test_label_bounds_are_inclusive() {
    let process = "a".repeat(30);
    let decision = "b".repeat(20);
    assert_checks_successfully(&format!("graph TD\nA[{process}] --> B{{{decision}}}"));
}

#[test]
fn test_edge_label_errors() {
    assert_fails_with("graph TD\nA[Start] -->|x > 1| B[End]", ErrorCode::E204);
    assert_fails_with("graph TD\nA[Start] -->|| B[End]", ErrorCode::E204);
}

#[test]
fn test_structural_errors() {
    assert_fails_with("graph TD\nA[Start --> B", ErrorCode::E101);
    assert_fails_with("graph TD\nA[Start] -->", ErrorCode::E102);
    assert_fails_with("graph TD\nA[Start] ==> B[End]", ErrorCode::E100);
    assert_fails_with("graph TD\nstart --> end", ErrorCode::E100);
}

#[test]
fn test_collects_every_error() {
    let codes = error_codes("graph TD\nA[x = 1] --> B[]\nB --> C{i < n}");
    assert_eq!(codes, vec![ErrorCode::E201, ErrorCode::E200, ErrorCode::E201]);
}

#[test]
fn test_label_span_points_at_content() {
    let source = "graph TD\nA[a-b]";
    let err = check(source).unwrap_err();
    let diagnostic = err.errors().next().unwrap();
    let span = diagnostic.labels()[0].span();
    assert_eq!(span, Span::new(11..14));
    assert_eq!(&source[span.start()..span.end()], "a-b");
}

#[test]
fn test_out_of_order_warning() {
    let warnings = assert_checks_successfully("graph TD\nA[Start] --> C[End]\nC --> D[Done]");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code(), Some(ErrorCode::E300));
    assert_eq!(warnings[0].severity(), Severity::Warning);
}

#[test]
fn test_redeclaration_warning() {
    let warnings = assert_checks_successfully("graph TD\nA[Start] --> B[Work]\nB[Other] --> C[End]");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code(), Some(ErrorCode::E301));
    assert_eq!(warnings[0].labels().len(), 2);
}

#[test]
fn test_identical_redeclaration_is_fine() {
    let warnings = assert_checks_successfully("graph TD\nA[Start] --> B[Work]\nB[Work] --> C[End]");
    assert!(warnings.is_empty());
}

#[test]
fn test_errors_carry_warnings() {
    let err = check("graph TD\nA[Start] --> C[x = 1]").unwrap_err();
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert!(codes.contains(&ErrorCode::E201));
    assert!(codes.contains(&ErrorCode::E300));
}
