//! Mermaid text emission for [`FlowGraph`]s.
//!
//! The emitted diagram starts with `graph TD`, lists one edge per line in
//! insertion order and declares every node inline at its first mention:
//!
//! ```text
//! graph TD
//!     A[Program Start] --> B[Initialize Variables]
//!     B --> C[Main Execution]
//! ```
//!
//! An optional style block follows, with one `classDef` per [`NodeRole`] and
//! a `class` line for every role present in the graph.

use std::{collections::HashSet, fmt};

use codeflow_core::identifier::NodeId;

use crate::structure::{FlowGraph, FlowNode, NodeRole};

const INDENT: &str = "    ";

/// Fill, stroke and text color of a role's style class.
fn class_style(role: NodeRole) -> &'static str {
    match role {
        NodeRole::StartEnd => "fill:#e1f5fe,stroke:#01579b,stroke-width:2px,color:#000",
        NodeRole::Process => "fill:#f3e5f5,stroke:#4a148c,stroke-width:2px,color:#000",
        NodeRole::Decision => "fill:#fff3e0,stroke:#e65100,stroke-width:2px,color:#000",
        NodeRole::Loop => "fill:#e8f5e8,stroke:#1b5e20,stroke-width:2px,color:#000",
        NodeRole::Error => "fill:#ffebee,stroke:#c62828,stroke-width:2px,color:#000",
    }
}

/// Displays a [`FlowGraph`] as Mermaid flowchart text.
///
/// # Example
///
/// ```
/// use codeflow::{
///     export::Mermaid,
///     structure::{FlowGraph, NodeRole},
/// };
/// use codeflow_core::flowchart::Shape;
///
/// let mut graph = FlowGraph::new();
/// let start = graph.add_node(Shape::Process, "Start", NodeRole::StartEnd);
/// let end = graph.add_node(Shape::Process, "End", NodeRole::StartEnd);
/// graph.add_edge(start, end, None);
///
/// let text = Mermaid::new(&graph).with_styles(false).to_string();
/// assert_eq!(text, "graph TD\n    A[Start] --> B[End]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Mermaid<'a> {
    graph: &'a FlowGraph,
    include_styles: bool,
}

impl<'a> Mermaid<'a> {
    /// Creates an emitter that includes the style block.
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self {
            graph,
            include_styles: true,
        }
    }

    /// Sets whether the style block is emitted.
    pub fn with_styles(mut self, include_styles: bool) -> Self {
        self.include_styles = include_styles;
        self
    }

    fn write_styles(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for role in NodeRole::ALL {
            write!(f, "\n{INDENT}classDef {} {}", role.class_name(), class_style(role))?;
        }
        for role in self.graph.roles() {
            let members: Vec<String> = self
                .graph
                .nodes()
                .filter(|node| node.role() == role)
                .map(|node| node.id().to_string())
                .collect();
            write!(f, "\n{INDENT}class {} {}", members.join(","), role.class_name())?;
        }
        Ok(())
    }
}

/// Writes `node`, declaring it if this is its first mention.
fn write_node(
    f: &mut fmt::Formatter<'_>,
    node: &FlowNode,
    declared: &mut HashSet<NodeId>,
) -> fmt::Result {
    write!(f, "{}", node.id())?;
    if let Some(label) = node.label() {
        if declared.insert(node.id()) {
            let shape = node.shape();
            write!(f, "{}{}{}", shape.open(), label, shape.close())?;
        }
    }
    Ok(())
}

impl fmt::Display for Mermaid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph TD")?;

        let mut declared = HashSet::new();
        let mut connected = HashSet::new();
        for (from, to, edge) in self.graph.edges() {
            connected.insert(from.id());
            connected.insert(to.id());

            write!(f, "\n{INDENT}")?;
            write_node(f, from, &mut declared)?;
            match edge.label() {
                Some(label) => write!(f, " -->|{label}| ")?,
                None => write!(f, " --> ")?,
            }
            write_node(f, to, &mut declared)?;
        }

        for node in self.graph.nodes() {
            if !connected.contains(&node.id()) {
                write!(f, "\n{INDENT}")?;
                write_node(f, node, &mut declared)?;
            }
        }

        if self.include_styles {
            writeln!(f)?;
            self.write_styles(f)?;
        }
        Ok(())
    }
}
