//! Directed flow graph shared by the fallback synthesizer and the exporter.
//!
//! A [`FlowGraph`] wraps a petgraph [`DiGraph`] and keeps node identifiers in
//! first-introduction order, so emitting the graph edge by edge reproduces the
//! order the nodes were created in.

use indexmap::IndexMap;
use log::trace;
use petgraph::{
    algo::tarjan_scc,
    graph::{DiGraph, EdgeIndex, NodeIndex},
};

use codeflow_core::{
    flowchart::{Flowchart, Shape},
    identifier::NodeId,
};

/// What a node stands for, used to pick its style class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Program start and end.
    StartEnd,
    /// A plain processing step.
    Process,
    /// A branch point.
    Decision,
    /// A step inside a loop body.
    Loop,
    /// An error handling step.
    Error,
}

impl NodeRole {
    /// Every role, in style block order.
    pub const ALL: [NodeRole; 5] = [
        NodeRole::StartEnd,
        NodeRole::Process,
        NodeRole::Decision,
        NodeRole::Loop,
        NodeRole::Error,
    ];

    /// Name of the style class for this role.
    pub fn class_name(&self) -> &'static str {
        match self {
            NodeRole::StartEnd => "startEnd",
            NodeRole::Process => "process",
            NodeRole::Decision => "decision",
            NodeRole::Loop => "loop",
            NodeRole::Error => "error",
        }
    }
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    id: NodeId,
    shape: Shape,
    label: Option<String>,
    role: NodeRole,
}

impl FlowNode {
    /// Creates a labelled node.
    pub fn new(id: NodeId, shape: Shape, label: impl Into<String>, role: NodeRole) -> Self {
        Self {
            id,
            shape,
            label: Some(label.into()),
            role,
        }
    }

    /// Creates a node that is only referenced by id.
    fn bare(id: NodeId) -> Self {
        Self {
            id,
            shape: Shape::Process,
            label: None,
            role: NodeRole::Process,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The label, if the node was ever declared.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }
}

/// An edge of the flow graph, optionally carrying a branch label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowEdge {
    label: Option<String>,
}

impl FlowEdge {
    pub fn new(label: Option<String>) -> Self {
        Self { label }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A directed flowchart graph.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    graph: DiGraph<FlowNode, FlowEdge>,
    node_id_map: IndexMap<NodeId, NodeIndex>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of a parsed flowchart.
    ///
    /// Nodes take the shape and label of their first declaration; nodes that
    /// are never declared are plain process nodes without a label.
    pub fn from_flowchart(flowchart: &Flowchart) -> Self {
        let mut graph = Self::new();

        for node in flowchart.node_refs() {
            let idx = match graph.node_id_map.get(&node.id()) {
                Some(idx) => *idx,
                None => graph.insert(FlowNode::bare(node.id())),
            };
            let flow_node = &mut graph.graph[idx];
            if flow_node.label.is_some() {
                continue;
            }
            if let (Some(shape), Some(label)) = (node.shape(), node.label()) {
                flow_node.shape = shape;
                flow_node.label = Some(label.to_string());
                if shape == Shape::Decision {
                    flow_node.role = NodeRole::Decision;
                }
            }
        }

        for edge in flowchart.edges() {
            let endpoints = (
                graph.node_id_map.get(&edge.from().id()).copied(),
                graph.node_id_map.get(&edge.to().id()).copied(),
            );
            if let (Some(from), Some(to)) = endpoints {
                graph.add_edge(from, to, edge.label());
            }
        }

        graph
    }

    /// Add a node with the next identifier in first-introduction order.
    pub fn add_node(&mut self, shape: Shape, label: &str, role: NodeRole) -> NodeIndex {
        let id = NodeId::from_index(self.graph.node_count());
        self.insert(FlowNode::new(id, shape, label, role))
    }

    fn insert(&mut self, node: FlowNode) -> NodeIndex {
        let id = node.id();
        let idx = self.graph.add_node(node);
        self.node_id_map.insert(id, idx);
        trace!(id:%, idx = idx.index(); "Added flow node");
        idx
    }

    /// Add a directed edge, optionally with a branch label.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, label: Option<&str>) -> EdgeIndex {
        self.graph
            .add_edge(from, to, FlowEdge::new(label.map(str::to_string)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node at `idx`, if it exists.
    pub fn node(&self, idx: NodeIndex) -> Option<&FlowNode> {
        self.graph.node_weight(idx)
    }

    /// Returns the node with identifier `id`, if it exists.
    pub fn node_by_id(&self, id: NodeId) -> Option<&FlowNode> {
        self.node_id_map
            .get(&id)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    /// Nodes in first-introduction order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.node_id_map
            .values()
            .filter_map(|idx| self.graph.node_weight(*idx))
    }

    /// Edges in insertion order, with their endpoints.
    pub fn edges(&self) -> impl Iterator<Item = (&FlowNode, &FlowNode, &FlowEdge)> {
        self.graph.edge_indices().filter_map(|edge_idx| {
            let (from, to) = self.graph.edge_endpoints(edge_idx)?;
            Some((
                self.graph.node_weight(from)?,
                self.graph.node_weight(to)?,
                self.graph.edge_weight(edge_idx)?,
            ))
        })
    }

    /// Number of decision-shaped nodes.
    pub fn decision_count(&self) -> usize {
        self.nodes()
            .filter(|node| node.shape() == Shape::Decision)
            .count()
    }

    /// Number of cycles, counted as strongly connected components with more
    /// than one node or a self-loop.
    pub fn cycle_count(&self) -> usize {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .count()
    }

    /// Roles present in the graph, in style block order.
    pub fn roles(&self) -> Vec<NodeRole> {
        NodeRole::ALL
            .into_iter()
            .filter(|role| self.nodes().any(|node| node.role() == *role))
            .collect()
    }
}
