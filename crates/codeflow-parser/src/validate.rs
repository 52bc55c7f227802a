//! Semantic checks over parsed statements.
//!
//! Runs after every statement parsed: label rules, identifier ordering and
//! conflicting redeclarations.

use std::collections::HashMap;

use codeflow_core::{
    flowchart::{LabelIssue, LabelLimits, Shape, check_label},
    identifier::NodeId,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parser::{ParsedLabel, ParsedNode, ParsedStatement},
    span::Span,
};

/// Run every check over `statements`, emitting into `collector`.
pub(crate) fn validate(statements: &[ParsedStatement<'_>], collector: &mut DiagnosticCollector) {
    for statement in statements {
        match statement {
            ParsedStatement::Node(node) => check_node_label(node, collector),
            ParsedStatement::Edge { from, to, label } => {
                check_node_label(from, collector);
                check_node_label(to, collector);
                if let Some((text, span)) = label {
                    check_edge_label(text, *span, collector);
                }
            }
            ParsedStatement::Style(_) | ParsedStatement::Comment(_) => {}
        }
    }

    check_first_use_order(statements, collector);
    check_redeclarations(statements, collector);
}

/// Node mentions in source order.
fn mentions<'s, 'a>(
    statements: &'s [ParsedStatement<'a>],
) -> impl Iterator<Item = &'s ParsedNode<'a>> {
    statements.iter().flat_map(|statement| {
        let (first, second) = match statement {
            ParsedStatement::Node(node) => (Some(node), None),
            ParsedStatement::Edge { from, to, .. } => (Some(from), Some(to)),
            ParsedStatement::Style(_) | ParsedStatement::Comment(_) => (None, None),
        };
        first.into_iter().chain(second)
    })
}

fn check_node_label(node: &ParsedNode<'_>, collector: &mut DiagnosticCollector) {
    let Some(label) = &node.label else {
        return;
    };
    let max = LabelLimits::GRAMMAR.for_shape(label.shape);
    if let Err(issue) = check_label(label.text, max) {
        collector.emit(label_diagnostic(label, &issue));
    }
}

fn label_diagnostic(label: &ParsedLabel<'_>, issue: &LabelIssue) -> Diagnostic {
    let shape = match label.shape {
        Shape::Process => "process",
        Shape::Decision => "decision",
    };

    match issue {
        LabelIssue::Empty => Diagnostic::error(format!("empty {shape} label"))
            .with_code(ErrorCode::E200)
            .with_label(label.span, "nothing between the brackets")
            .with_help("give the node a short description such as `Process data`"),
        LabelIssue::InvalidChar(c) => {
            Diagnostic::error(format!("{shape} label contains disallowed character `{c}`"))
                .with_code(ErrorCode::E201)
                .with_label(label.span, "label with code syntax")
                .with_help("labels may only contain letters, digits and single spaces")
        }
        LabelIssue::IrregularSpacing => {
            Diagnostic::error(format!("{shape} label has irregular spacing"))
                .with_code(ErrorCode::E203)
                .with_label(label.span, "leading, trailing or repeated spaces")
                .with_help("separate words with exactly one space")
        }
        LabelIssue::TooLong { len, max } => {
            Diagnostic::error(format!("{shape} label is {len} characters long"))
                .with_code(ErrorCode::E202)
                .with_label(label.span, format!("the limit is {max}"))
                .with_help("use a generic description such as `Check condition`")
        }
    }
}

fn check_edge_label(text: &str, span: Span, collector: &mut DiagnosticCollector) {
    // Branch labels share the decision bound.
    if let Err(issue) = check_label(text, LabelLimits::GRAMMAR.decision()) {
        collector.emit(
            Diagnostic::error(format!("invalid branch label: {issue}"))
                .with_code(ErrorCode::E204)
                .with_label(span, "branch label")
                .with_help("use a single word such as `Yes`, `No` or `Continue`"),
        );
    }
}

/// Warn about the first identifier introduced out of first-use order.
fn check_first_use_order(statements: &[ParsedStatement<'_>], collector: &mut DiagnosticCollector) {
    let mut seen: Vec<NodeId> = Vec::new();

    for node in mentions(statements) {
        if seen.contains(&node.id) {
            continue;
        }
        let expected = NodeId::from_index(seen.len());
        if node.id != expected {
            collector.emit(
                Diagnostic::warning(format!("node `{}` introduced out of order", node.id))
                    .with_code(ErrorCode::E300)
                    .with_label(node.id_span, format!("expected `{expected}` here"))
                    .with_help("assign identifiers A, B, C, ... in order of first use"),
            );
            return;
        }
        seen.push(node.id);
    }
}

/// Warn when a node is declared again with a different label or shape.
fn check_redeclarations(statements: &[ParsedStatement<'_>], collector: &mut DiagnosticCollector) {
    let mut declared: HashMap<NodeId, &ParsedLabel<'_>> = HashMap::new();

    for node in mentions(statements) {
        let Some(label) = &node.label else {
            continue;
        };
        match declared.get(&node.id) {
            None => {
                declared.insert(node.id, label);
            }
            Some(first) if first.shape != label.shape || first.text != label.text => {
                collector.emit(
                    Diagnostic::warning(format!(
                        "node `{}` is declared twice with different labels",
                        node.id
                    ))
                    .with_code(ErrorCode::E301)
                    .with_label(label.span, "redeclared here")
                    .with_secondary_label(first.span, "first declared here")
                    .with_help("declare each node once and refer to it by identifier"),
                );
            }
            Some(_) => {}
        }
    }
}
