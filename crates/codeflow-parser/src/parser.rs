//! Statement parser for diagram text.
//!
//! Diagram text is first split into raw statements at newlines and `;`
//! ([`split_statements`]); each statement is then parsed on its own with
//! winnow, so a malformed statement never hides problems in the next one.
//!
//! Grammar of a single statement:
//!
//! ```text
//! header     := ("graph" | "flowchart") SPACE+ DIRECTION
//! statement  := style | edge | node
//! style      := ("classDef" | "class" | "style" | "linkStyle") SPACE+ ANY*
//! edge       := node SPACE* "-->" ("|" LABEL "|")? SPACE* node
//! node       := ID ("[" LABEL "]" | "{" LABEL "}")?
//! ID         := [A-Z] [0-9]*
//! ```

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::{digit0, space0, space1},
    combinator::{alt, cut_err, eof, opt, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{one_of, rest, take_till, take_while},
};

use codeflow_core::{
    flowchart::{Direction, Shape},
    identifier::NodeId,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Rich diagnostic information for statement errors.
///
/// Attached to winnow errors via `.context()`; `start` is the offset, within
/// the statement, where the offending construct begins.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StatementDiagnostic {
    code: ErrorCode,
    message: &'static str,
    label: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<StatementDiagnostic>>;

/// One statement's text and its byte offset in the whole diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawStatement<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl RawStatement<'_> {
    /// Span of the whole statement in diagram coordinates.
    pub fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.text.len())
    }
}

/// A label between brackets, with the span of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedLabel<'a> {
    pub shape: Shape,
    pub text: &'a str,
    pub span: Span,
}

/// A node mention such as `B` or `B[Initialize]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedNode<'a> {
    pub id: NodeId,
    pub id_span: Span,
    pub label: Option<ParsedLabel<'a>>,
}

/// A parsed statement, spans in diagram coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedStatement<'a> {
    Node(ParsedNode<'a>),
    Edge {
        from: ParsedNode<'a>,
        to: ParsedNode<'a>,
        label: Option<(&'a str, Span)>,
    },
    Style(&'a str),
    Comment(&'a str),
}

impl ParsedNode<'_> {
    fn shifted(mut self, offset: usize) -> Self {
        self.id_span = self.id_span.shifted(offset);
        if let Some(label) = &mut self.label {
            label.span = label.span.shifted(offset);
        }
        self
    }
}

impl ParsedStatement<'_> {
    fn shifted(self, offset: usize) -> Self {
        match self {
            ParsedStatement::Node(node) => ParsedStatement::Node(node.shifted(offset)),
            ParsedStatement::Edge { from, to, label } => ParsedStatement::Edge {
                from: from.shifted(offset),
                to: to.shifted(offset),
                label: label.map(|(text, span)| (text, span.shifted(offset))),
            },
            other => other,
        }
    }
}

/// Split diagram text into trimmed, non-empty raw statements.
///
/// Statements end at a newline or `;`. Comment lines (`%%`) are kept whole.
pub(crate) fn split_statements(source: &str) -> Vec<RawStatement<'_>> {
    let mut statements = Vec::new();
    let mut line_offset = 0;

    for line in source.split('\n') {
        let current = line_offset;
        line_offset += line.len() + 1;

        if line.trim_start().starts_with("%%") {
            push_trimmed(&mut statements, line, current);
            continue;
        }

        let mut part_offset = current;
        for part in line.split(';') {
            push_trimmed(&mut statements, part, part_offset);
            part_offset += part.len() + 1;
        }
    }

    statements
}

fn push_trimmed<'a>(statements: &mut Vec<RawStatement<'a>>, part: &'a str, offset: usize) {
    let text = part.trim();
    if text.is_empty() {
        return;
    }
    let leading = part.len() - part.trim_start().len();
    statements.push(RawStatement {
        text,
        offset: offset + leading,
    });
}

/// Parse a node identifier: one uppercase letter followed by optional digits.
fn node_id(input: &mut Input<'_>) -> IResult<(NodeId, Span)> {
    (one_of('A'..='Z'), digit0)
        .take()
        .with_span()
        .verify_map(|(text, range): (&str, Range<usize>)| {
            text.parse::<NodeId>().ok().map(|id| (id, Span::new(range)))
        })
        .parse_next(input)
}

/// Parse a bracketed label, committing once the opening bracket is seen.
fn node_label<'a>(input: &mut Input<'a>) -> IResult<ParsedLabel<'a>> {
    let start = input.current_token_start();
    let shape = alt(('['.value(Shape::Process), '{'.value(Shape::Decision))).parse_next(input)?;
    let close = shape.close();

    let (text, range) = cut_err(terminated(take_till(0.., close).with_span(), close))
        .context(StatementDiagnostic {
            code: ErrorCode::E101,
            message: "unterminated label",
            label: "label opened here is never closed",
            help: Some("close the label on the same statement with `]` or `}`"),
            start,
        })
        .parse_next(input)?;

    Ok(ParsedLabel {
        shape,
        text,
        span: Span::new(range),
    })
}

/// Parse a node mention with an optional inline declaration.
fn node_ref<'a>(input: &mut Input<'a>) -> IResult<ParsedNode<'a>> {
    let (id, id_span) = node_id.parse_next(input)?;
    let label = opt(node_label).parse_next(input)?;
    Ok(ParsedNode { id, id_span, label })
}

/// Parse `-->` with an optional `|branch label|`.
fn arrow<'a>(input: &mut Input<'a>) -> IResult<Option<(&'a str, Span)>> {
    "-->".parse_next(input)?;
    let start = input.current_token_start();
    opt(preceded(
        '|',
        cut_err(terminated(take_till(0.., '|').with_span(), '|')).context(
            StatementDiagnostic {
                code: ErrorCode::E102,
                message: "unterminated branch label",
                label: "branch label opened here is never closed",
                help: Some("write branch labels as `-->|Yes|`"),
                start,
            },
        ),
    ))
    .map(|label| label.map(|(text, range)| (text, Span::new(range))))
    .parse_next(input)
}

/// Parse a node declaration or an edge.
fn flow_statement<'a>(input: &mut Input<'a>) -> IResult<ParsedStatement<'a>> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;

    let arrow_start = input.current_token_start();
    let Some(label) = opt(arrow).parse_next(input)? else {
        return Ok(ParsedStatement::Node(from));
    };
    space0.parse_next(input)?;

    let to = cut_err(node_ref)
        .context(StatementDiagnostic {
            code: ErrorCode::E102,
            message: "edge is missing its target",
            label: "arrow without a target node",
            help: Some("name the target node, for example `A --> B`"),
            start: arrow_start,
        })
        .parse_next(input)?;

    Ok(ParsedStatement::Edge { from, to, label })
}

/// Parse a style statement, kept verbatim.
fn style_statement<'a>(input: &mut Input<'a>) -> IResult<ParsedStatement<'a>> {
    (alt(("classDef", "class", "style", "linkStyle")), space1, rest)
        .take()
        .map(ParsedStatement::Style)
        .parse_next(input)
}

/// Parse one complete statement, rejecting trailing input.
fn statement<'a>(input: &mut Input<'a>) -> IResult<ParsedStatement<'a>> {
    let parsed = alt((style_statement, flow_statement)).parse_next(input)?;
    let start = input.current_token_start();
    cut_err((space0, eof))
        .context(StatementDiagnostic {
            code: ErrorCode::E100,
            message: "unexpected input after statement",
            label: "unexpected input",
            help: Some(
                "node identifiers are one uppercase letter optionally followed by digits, \
                 and labels may not contain brackets",
            ),
            start,
        })
        .parse_next(input)?;
    Ok(parsed)
}

/// Parse the header keyword and the raw direction word, if any.
fn header<'a>(input: &mut Input<'a>) -> IResult<Option<(&'a str, Span)>> {
    alt(("graph", "flowchart")).parse_next(input)?;
    let direction = opt(preceded(
        space1,
        take_while(1.., |c: char| c.is_ascii_alphabetic()).with_span(),
    ))
    .parse_next(input)?;
    (space0, eof).parse_next(input)?;
    Ok(direction.map(|(text, range)| (text, Span::new(range))))
}

/// Parse the header statement.
///
/// Returns an `E001` diagnostic when the statement is not a header at all,
/// and `E002` when it is a header with a missing or unknown direction.
pub(crate) fn parse_header(raw: &RawStatement<'_>) -> Result<Direction, Diagnostic> {
    let mut input = LocatingSlice::new(raw.text);
    let direction = header.parse_next(&mut input).map_err(|_| {
        Diagnostic::error("diagram must start with a `graph TD` header")
            .with_code(ErrorCode::E001)
            .with_label(raw.span(), "expected the header here")
            .with_help("begin the diagram with `graph TD`")
    })?;

    match direction {
        Some((keyword, span)) => Direction::from_keyword(keyword).ok_or_else(|| {
            Diagnostic::error(format!("unsupported direction `{keyword}`"))
                .with_code(ErrorCode::E002)
                .with_label(span.shifted(raw.offset), "unknown direction")
                .with_help("use one of `TD`, `TB`, `BT`, `LR`, `RL`")
        }),
        None => Err(Diagnostic::error("diagram header has no direction")
            .with_code(ErrorCode::E002)
            .with_label(raw.span(), "missing direction")
            .with_help("write the header as `graph TD`")),
    }
}

/// Parse a single non-header statement.
pub(crate) fn parse_statement<'a>(raw: &RawStatement<'a>) -> Result<ParsedStatement<'a>, Diagnostic> {
    if let Some(comment) = raw.text.strip_prefix("%%") {
        return Ok(ParsedStatement::Comment(comment.trim()));
    }

    let mut input = LocatingSlice::new(raw.text);
    match statement.parse_next(&mut input) {
        Ok(ParsedStatement::Node(ParsedNode { label: None, .. })) => Err(Diagnostic::error(
            "node statement without a label",
        )
        .with_code(ErrorCode::E100)
        .with_label(raw.span(), "bare node identifier")
        .with_help("declare the node as `A[label]` or connect it with `-->`")),
        Ok(parsed) => Ok(parsed.shifted(raw.offset)),
        Err(err) => {
            let position = input.current_token_start();
            Err(convert_error(err, raw, position))
        }
    }
}

/// Convert a winnow error into a diagnostic.
fn convert_error(
    err: ErrMode<ContextError<StatementDiagnostic>>,
    raw: &RawStatement<'_>,
    position: usize,
) -> Diagnostic {
    let context = match &err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().cloned(),
        ErrMode::Incomplete(_) => None,
    };

    let len = raw.text.len();
    match context {
        Some(ctx) => {
            let span = Span::new(ctx.start.min(len)..len).shifted(raw.offset);
            let diagnostic = Diagnostic::error(ctx.message)
                .with_code(ctx.code)
                .with_label(span, ctx.label);
            match ctx.help {
                Some(help) => diagnostic.with_help(help),
                None => diagnostic,
            }
        }
        None => {
            let start = position.min(len.saturating_sub(1));
            Diagnostic::error("expected a node declaration, an edge or a style statement")
                .with_code(ErrorCode::E100)
                .with_label(
                    Span::new(start..len).shifted(raw.offset),
                    "not a valid statement",
                )
                .with_help("statements look like `A[Start] --> B[Initialize]` or `C{Check value}`")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> RawStatement<'_> {
        RawStatement { text, offset: 0 }
    }

    #[test]
    fn test_split_statements_offsets() {
        let source = "graph TD;\n  A[Start] --> B ;C{Check}\n\n%% note; kept";
        let statements = split_statements(source);
        let texts: Vec<_> = statements.iter().map(|s| s.text).collect();
        assert_eq!(
            texts,
            vec!["graph TD", "A[Start] --> B", "C{Check}", "%% note; kept"]
        );

        for statement in &statements {
            let span = statement.span();
            assert_eq!(&source[span.start()..span.end()], statement.text);
        }
    }

    #[test]
    fn test_node_id() {
        let mut input = LocatingSlice::new("B12[x]");
        let (id, span) = node_id.parse_next(&mut input).unwrap();
        assert_eq!(id.to_string(), "B12");
        assert_eq!(span, Span::new(0..3));

        let mut input = LocatingSlice::new("b");
        assert!(node_id.parse_next(&mut input).is_err());
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header(&raw("graph TD")).unwrap(), Direction::TopDown);
        assert_eq!(
            parse_header(&raw("flowchart LR")).unwrap(),
            Direction::LeftRight
        );

        let missing = parse_header(&raw("A --> B")).unwrap_err();
        assert_eq!(missing.code(), Some(ErrorCode::E001));

        let bad = parse_header(&raw("graph XY")).unwrap_err();
        assert_eq!(bad.code(), Some(ErrorCode::E002));
        assert_eq!(bad.labels()[0].span(), Span::new(6..8));

        let none = parse_header(&raw("graph")).unwrap_err();
        assert_eq!(none.code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_parse_edge_with_declarations() {
        let parsed = parse_statement(&raw("E{Loop Condition} -->|Continue| F[Loop Body]")).unwrap();
        let ParsedStatement::Edge { from, to, label } = parsed else {
            panic!("Expected edge");
        };

        assert_eq!(from.id.to_string(), "E");
        let from_label = from.label.unwrap();
        assert_eq!(from_label.shape, Shape::Decision);
        assert_eq!(from_label.text, "Loop Condition");
        assert_eq!(from_label.span, Span::new(2..16));

        assert_eq!(label.map(|(text, _)| text), Some("Continue"));
        assert_eq!(to.label.unwrap().text, "Loop Body");
    }

    #[test]
    fn test_parse_compact_edge() {
        let parsed = parse_statement(&raw("A-->B")).unwrap();
        assert!(matches!(parsed, ParsedStatement::Edge { label: None, .. }));
    }

    #[test]
    fn test_parse_style_and_comment() {
        let parsed = parse_statement(&raw("classDef process fill:#f3e5f5,stroke:#4a148c")).unwrap();
        assert_eq!(
            parsed,
            ParsedStatement::Style("classDef process fill:#f3e5f5,stroke:#4a148c")
        );

        let parsed = parse_statement(&raw("class A,P startEnd")).unwrap();
        assert!(matches!(parsed, ParsedStatement::Style(_)));

        let parsed = parse_statement(&raw("%% generated")).unwrap();
        assert_eq!(parsed, ParsedStatement::Comment("generated"));
    }

    #[test]
    fn test_spans_are_shifted_to_diagram_coordinates() {
        let statement = RawStatement {
            text: "C[Main]",
            offset: 20,
        };
        let ParsedStatement::Node(node) = parse_statement(&statement).unwrap() else {
            panic!("Expected node");
        };
        assert_eq!(node.id_span, Span::new(20..21));
        assert_eq!(node.label.unwrap().span, Span::new(22..26));
    }

    #[test]
    fn test_unterminated_label() {
        let err = parse_statement(&raw("A[Start --> B")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.labels()[0].span(), Span::new(1..13));
    }

    #[test]
    fn test_edge_without_target() {
        let err = parse_statement(&raw("A[Start] -->")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_unterminated_branch_label() {
        let err = parse_statement(&raw("A -->|Yes B")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_statement(&raw("A[x[0]]")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_bare_node_rejected() {
        let err = parse_statement(&raw("A")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_garbage_statement() {
        let err = parse_statement(&raw("start --> end")).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert!(!err.labels().is_empty());
    }
}
