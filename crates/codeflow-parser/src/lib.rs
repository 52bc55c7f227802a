//! # Codeflow Parser
//!
//! Grammar checker for Codeflow flowchart diagrams. Parses diagram text into
//! a [`Flowchart`] and reports every deviation from the output grammar as a
//! [`Diagnostic`](error::Diagnostic).
//!
//! ## Usage
//!
//! ```
//! # use codeflow_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let diagram = "graph TD;\n    A[Start] --> B[Process data]\n    B --> C[End]";
//!     let flowchart = parse(diagram)?;
//!     assert_eq!(flowchart.edges().count(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;
mod parser;
#[cfg(test)]
mod parser_tests;
mod span;
mod validate;

pub use span::{Span, Spanned};

use log::debug;

use codeflow_core::flowchart::{Direction, Edge, Flowchart, NodeRef, Statement};

use error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};
use parser::{ParsedNode, ParsedStatement};

/// A diagram that passed the grammar check, with its warnings.
#[derive(Debug, Clone)]
pub struct Checked {
    flowchart: Flowchart,
    warnings: Vec<Diagnostic>,
}

impl Checked {
    /// The parsed diagram.
    pub fn flowchart(&self) -> &Flowchart {
        &self.flowchart
    }

    /// Warnings raised while checking.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Take the parsed diagram, discarding warnings.
    pub fn into_flowchart(self) -> Flowchart {
        self.flowchart
    }
}

/// Parse diagram text into a [`Flowchart`].
///
/// Fails with every collected diagnostic when the text breaks the grammar.
/// Warnings do not fail the parse; use [`check`] to see them.
pub fn parse(source: &str) -> Result<Flowchart, ParseError> {
    check(source).map(Checked::into_flowchart)
}

/// Check diagram text against the grammar.
///
/// The pipeline:
///
/// 1. **Split** - Cut the text into statements at newlines and `;`
/// 2. **Header** - Read `graph <direction>` from the first statement
/// 3. **Parse** - Parse every other statement on its own
/// 4. **Validate** - Check labels, identifier order and redeclarations
///
/// Every step keeps going after an error, so one call reports all problems.
pub fn check(source: &str) -> Result<Checked, ParseError> {
    let mut collector = DiagnosticCollector::new();

    // Step 1: Split
    let raws = parser::split_statements(source);

    // Step 2: Header
    let (direction, body) = match raws.split_first() {
        None => {
            collector.emit(
                Diagnostic::error("diagram is empty")
                    .with_code(ErrorCode::E001)
                    .with_label(Span::new(0..source.len()), "no statements")
                    .with_help("begin the diagram with `graph TD`"),
            );
            (Direction::default(), &raws[..])
        }
        Some((first, rest)) => match parser::parse_header(first) {
            Ok(direction) => (direction, rest),
            Err(diagnostic) => {
                let is_header = diagnostic.code() != Some(ErrorCode::E001);
                collector.emit(diagnostic);
                if is_header {
                    (Direction::default(), rest)
                } else {
                    (Direction::default(), &raws[..])
                }
            }
        },
    };

    // Step 3: Parse
    let mut parsed = Vec::with_capacity(body.len());
    for raw in body {
        match parser::parse_statement(raw) {
            Ok(statement) => parsed.push(statement),
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    // Step 4: Validate
    validate::validate(&parsed, &mut collector);

    let statements: Vec<Statement> = parsed.iter().map(to_statement).collect();
    debug!(
        statements = statements.len(),
        direction = direction.keyword(),
        failed = collector.has_errors();
        "Checked diagram"
    );

    let warnings = collector.finish()?;
    Ok(Checked {
        flowchart: Flowchart::new(direction, statements),
        warnings,
    })
}

fn to_node_ref(node: &ParsedNode<'_>) -> NodeRef {
    match &node.label {
        Some(label) => NodeRef::declared(node.id, label.shape, label.text),
        None => NodeRef::bare(node.id),
    }
}

fn to_statement(parsed: &ParsedStatement<'_>) -> Statement {
    match parsed {
        ParsedStatement::Node(node) => Statement::Node(to_node_ref(node)),
        ParsedStatement::Edge { from, to, label } => Statement::Edge(Edge::new(
            to_node_ref(from),
            to_node_ref(to),
            label.as_ref().map(|(text, _)| (*text).to_string()),
        )),
        ParsedStatement::Style(text) => Statement::Style((*text).to_string()),
        ParsedStatement::Comment(text) => Statement::Comment((*text).to_string()),
    }
}
