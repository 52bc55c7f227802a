//! Statement model for the restricted flowchart grammar.
//!
//! A diagram is a header (`graph TD`) followed by statements. Node and edge
//! statements carry labels drawn from a deliberately small alphabet so that
//! any downstream Mermaid renderer accepts them:
//!
//! - letters, digits and single spaces only
//! - at most [`LabelLimits::process`] characters inside `[...]`
//! - at most [`LabelLimits::decision`] characters inside `{...}`
//!
//! Style statements (`classDef`, `class`, `style`, `linkStyle`) and `%%`
//! comments are carried through verbatim.

use std::fmt;

use thiserror::Error;

use crate::identifier::NodeId;

/// Flow direction declared in the diagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Top-down (`TD`), the direction every generated diagram uses.
    #[default]
    TopDown,
    /// Top-to-bottom (`TB`), an alias of top-down.
    TopBottom,
    /// Bottom-up (`BT`).
    BottomTop,
    /// Left-to-right (`LR`).
    LeftRight,
    /// Right-to-left (`RL`).
    RightLeft,
}

impl Direction {
    /// Parses the two-letter direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "TD" => Some(Self::TopDown),
            "TB" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// Returns the two-letter direction keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Node shape, determined by the bracket kind around the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Process or terminal node: `A[label]`.
    Process,
    /// Decision node: `A{label}`.
    Decision,
}

impl Shape {
    /// Returns the opening bracket for this shape.
    pub fn open(&self) -> char {
        match self {
            Self::Process => '[',
            Self::Decision => '{',
        }
    }

    /// Returns the closing bracket for this shape.
    pub fn close(&self) -> char {
        match self {
            Self::Process => ']',
            Self::Decision => '}',
        }
    }

    /// Returns the shape opened by `c`, if `c` is an opening bracket.
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '[' => Some(Self::Process),
            '{' => Some(Self::Decision),
            _ => None,
        }
    }

    /// Returns the shape closed by `c`, if `c` is a closing bracket.
    pub fn from_close(c: char) -> Option<Self> {
        match c {
            ']' => Some(Self::Process),
            '}' => Some(Self::Decision),
            _ => None,
        }
    }
}

/// Maximum label lengths per node shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLimits {
    process: usize,
    decision: usize,
}

impl LabelLimits {
    /// The bounds of the output grammar: 30 for process labels, 20 for
    /// decision labels.
    pub const GRAMMAR: Self = Self {
        process: 30,
        decision: 20,
    };

    /// Creates limits with the given bounds.
    pub fn new(process: usize, decision: usize) -> Self {
        Self { process, decision }
    }

    /// Maximum length of a `[...]` label.
    pub fn process(&self) -> usize {
        self.process
    }

    /// Maximum length of a `{...}` label.
    pub fn decision(&self) -> usize {
        self.decision
    }

    /// Maximum label length for `shape`.
    pub fn for_shape(&self, shape: Shape) -> usize {
        match shape {
            Shape::Process => self.process,
            Shape::Decision => self.decision,
        }
    }
}

impl Default for LabelLimits {
    fn default() -> Self {
        Self::GRAMMAR
    }
}

/// Reason a label does not belong to the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelIssue {
    #[error("label is empty")]
    Empty,

    #[error("label contains disallowed character `{0}`")]
    InvalidChar(char),

    #[error("label has leading, trailing or repeated spaces")]
    IrregularSpacing,

    #[error("label is {len} characters long, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Returns `true` if `c` may appear in a label.
pub fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

/// Checks `text` against the label rules with maximum length `max`.
///
/// # Examples
///
/// ```
/// use codeflow_core::flowchart::{check_label, LabelIssue};
///
/// assert!(check_label("Check condition", 20).is_ok());
/// assert_eq!(check_label("a  b", 20), Err(LabelIssue::IrregularSpacing));
/// assert_eq!(check_label("x[0]", 20), Err(LabelIssue::InvalidChar('[')));
/// ```
pub fn check_label(text: &str, max: usize) -> Result<(), LabelIssue> {
    if text.is_empty() {
        return Err(LabelIssue::Empty);
    }
    if let Some(c) = text.chars().find(|c| !is_label_char(*c)) {
        return Err(LabelIssue::InvalidChar(c));
    }
    if text.starts_with(' ') || text.ends_with(' ') || text.contains("  ") {
        return Err(LabelIssue::IrregularSpacing);
    }
    let len = text.chars().count();
    if len > max {
        return Err(LabelIssue::TooLong { len, max });
    }
    Ok(())
}

/// A node mention, optionally carrying an inline declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    id: NodeId,
    declaration: Option<(Shape, String)>,
}

impl NodeRef {
    /// Creates a bare reference such as `B`.
    pub fn bare(id: NodeId) -> Self {
        Self {
            id,
            declaration: None,
        }
    }

    /// Creates a reference with an inline declaration such as `B[label]`.
    pub fn declared(id: NodeId, shape: Shape, label: impl Into<String>) -> Self {
        Self {
            id,
            declaration: Some((shape, label.into())),
        }
    }

    /// The referenced node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Shape of the inline declaration, if any.
    pub fn shape(&self) -> Option<Shape> {
        self.declaration.as_ref().map(|(shape, _)| *shape)
    }

    /// Label of the inline declaration, if any.
    pub fn label(&self) -> Option<&str> {
        self.declaration.as_ref().map(|(_, label)| label.as_str())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some((shape, label)) = &self.declaration {
            write!(f, "{}{}{}", shape.open(), label, shape.close())?;
        }
        Ok(())
    }
}

/// A directed edge `from --> to`, optionally labelled `-->|label|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: NodeRef,
    to: NodeRef,
    label: Option<String>,
}

impl Edge {
    /// Creates an edge.
    pub fn new(from: NodeRef, to: NodeRef, label: Option<String>) -> Self {
        Self { from, to, label }
    }

    /// Source node reference.
    pub fn from(&self) -> &NodeRef {
        &self.from
    }

    /// Target node reference.
    pub fn to(&self) -> &NodeRef {
        &self.to
    }

    /// Branch label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} -->|{}| {}", self.from, label, self.to),
            None => write!(f, "{} --> {}", self.from, self.to),
        }
    }
}

/// One statement of a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Standalone node declaration.
    Node(NodeRef),
    /// Edge, possibly declaring its endpoints inline.
    Edge(Edge),
    /// Styling statement kept verbatim.
    Style(String),
    /// `%%` comment kept verbatim (without the marker).
    Comment(String),
}

/// A parsed diagram: header direction plus statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flowchart {
    direction: Direction,
    statements: Vec<Statement>,
}

impl Flowchart {
    /// Creates a flowchart.
    pub fn new(direction: Direction, statements: Vec<Statement>) -> Self {
        Self {
            direction,
            statements,
        }
    }

    /// Header direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// All statements in source order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Iterates over edge statements.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Edge(edge) => Some(edge),
            _ => None,
        })
    }

    /// Iterates over every node mention, in source order.
    pub fn node_refs(&self) -> impl Iterator<Item = &NodeRef> {
        self.statements.iter().flat_map(|statement| {
            let (first, second) = match statement {
                Statement::Node(node) => (Some(node), None),
                Statement::Edge(edge) => (Some(edge.from()), Some(edge.to())),
                Statement::Style(_) | Statement::Comment(_) => (None, None),
            };
            first.into_iter().chain(second)
        })
    }

    /// Node identifiers in first-mention order, without duplicates.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut seen = Vec::new();
        for node in self.node_refs() {
            if !seen.contains(&node.id()) {
                seen.push(node.id());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        s.parse().unwrap()
    }

    #[test]
    fn test_direction_keywords() {
        for keyword in ["TD", "TB", "BT", "LR", "RL"] {
            let direction = Direction::from_keyword(keyword).unwrap();
            assert_eq!(direction.keyword(), keyword);
        }
        assert_eq!(Direction::from_keyword("XY"), None);
    }

    #[test]
    fn test_shape_brackets() {
        for shape in [Shape::Process, Shape::Decision] {
            assert_eq!(Shape::from_open(shape.open()), Some(shape));
            assert_eq!(Shape::from_close(shape.close()), Some(shape));
        }
        assert_eq!(Shape::from_open(']'), None);
        assert_eq!(Shape::from_close('('), None);
    }

    #[test]
    fn test_label_limits() {
        let limits = LabelLimits::default();
        assert_eq!(limits.for_shape(Shape::Process), 30);
        assert_eq!(limits.for_shape(Shape::Decision), 20);
    }

    #[test]
    fn test_check_label_issues() {
        assert_eq!(check_label("", 30), Err(LabelIssue::Empty));
        assert_eq!(check_label(" lead", 30), Err(LabelIssue::IrregularSpacing));
        assert_eq!(check_label("trail ", 30), Err(LabelIssue::IrregularSpacing));
        assert_eq!(check_label("a(b)", 30), Err(LabelIssue::InvalidChar('(')));
        assert_eq!(
            check_label("abcdefghijklmnopqrstu", 20),
            Err(LabelIssue::TooLong { len: 21, max: 20 })
        );
        assert!(check_label("Loop Body 2", 30).is_ok());
    }

    #[test]
    fn test_edge_display() {
        let edge = Edge::new(
            NodeRef::declared(id("E"), Shape::Decision, "Conditional Logic"),
            NodeRef::declared(id("F"), Shape::Process, "Execute Branch A"),
            Some("True".to_string()),
        );
        assert_eq!(
            edge.to_string(),
            "E{Conditional Logic} -->|True| F[Execute Branch A]"
        );

        let plain = Edge::new(NodeRef::bare(id("G")), NodeRef::bare(id("H")), None);
        assert_eq!(plain.to_string(), "G --> H");
    }

    #[test]
    fn test_node_ids_first_mention_order() {
        let chart = Flowchart::new(
            Direction::TopDown,
            vec![
                Statement::Edge(Edge::new(
                    NodeRef::bare(id("A")),
                    NodeRef::bare(id("C")),
                    None,
                )),
                Statement::Style("classDef x fill:#fff".to_string()),
                Statement::Edge(Edge::new(
                    NodeRef::bare(id("C")),
                    NodeRef::bare(id("B")),
                    None,
                )),
            ],
        );
        assert_eq!(chart.node_ids(), vec![id("A"), id("C"), id("B")]);
        assert_eq!(chart.edges().count(), 2);
    }
}
