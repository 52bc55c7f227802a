//! The fixed fallback topology.
//!
//! A linear spine `Program Start → Initialize Variables → Main Execution →
//! Process Results → Generate Output → Program End` with one optional block
//! per detected feature. Nodes are created at their first mention, so
//! identifiers follow first-introduction order.

use petgraph::graph::NodeIndex;

use codeflow_core::{features::FeatureFlags, flowchart::Shape};

use crate::structure::{FlowGraph, NodeRole};

/// Build the fallback graph for `flags`.
///
/// Async code is reported but adds no structure.
pub(crate) fn build(flags: FeatureFlags) -> FlowGraph {
    let mut graph = FlowGraph::new();

    let start = graph.add_node(Shape::Process, "Program Start", NodeRole::StartEnd);
    let init = process(&mut graph, "Initialize Variables");
    graph.add_edge(start, init, None);

    let main = if flags.has_function() {
        let define = process(&mut graph, "Define Functions and Classes");
        graph.add_edge(init, define, None);
        let main = process(&mut graph, "Main Execution");
        graph.add_edge(define, main, None);
        main
    } else {
        let main = process(&mut graph, "Main Execution");
        graph.add_edge(init, main, None);
        main
    };

    let results = if flags.has_condition() {
        let branch = decision(&mut graph, "Conditional Logic");
        graph.add_edge(main, branch, None);
        let branch_a = process(&mut graph, "Execute Branch A");
        graph.add_edge(branch, branch_a, Some("True"));
        let branch_b = process(&mut graph, "Execute Branch B");
        graph.add_edge(branch, branch_b, Some("False"));
        join(&mut graph, [branch_a, branch_b], "Process Results", NodeRole::Process)
    } else {
        let results = process(&mut graph, "Process Results");
        graph.add_edge(main, results, None);
        results
    };

    let output = if flags.has_loop() {
        let condition = decision(&mut graph, "Loop Condition");
        graph.add_edge(results, condition, None);
        let body = graph.add_node(Shape::Process, "Loop Body", NodeRole::Loop);
        graph.add_edge(condition, body, Some("Continue"));
        let update = graph.add_node(Shape::Process, "Update Variables", NodeRole::Loop);
        graph.add_edge(body, update, None);
        graph.add_edge(update, condition, None);
        let output = process(&mut graph, "Generate Output");
        graph.add_edge(condition, output, Some("Exit"));
        output
    } else {
        let output = process(&mut graph, "Generate Output");
        graph.add_edge(results, output, None);
        output
    };

    if flags.has_try_catch() {
        let handling = decision(&mut graph, "Error Handling");
        graph.add_edge(output, handling, None);
        let success = process(&mut graph, "Success Path");
        graph.add_edge(handling, success, Some("Success"));
        let handler = graph.add_node(Shape::Process, "Error Handler", NodeRole::Error);
        graph.add_edge(handling, handler, Some("Error"));
        join(&mut graph, [success, handler], "Program End", NodeRole::StartEnd);
    } else {
        let end = graph.add_node(Shape::Process, "Program End", NodeRole::StartEnd);
        graph.add_edge(output, end, None);
    }

    graph
}

fn process(graph: &mut FlowGraph, label: &str) -> NodeIndex {
    graph.add_node(Shape::Process, label, NodeRole::Process)
}

fn decision(graph: &mut FlowGraph, label: &str) -> NodeIndex {
    graph.add_node(Shape::Decision, label, NodeRole::Decision)
}

/// Add a node every branch in `branches` flows into.
fn join(
    graph: &mut FlowGraph,
    branches: [NodeIndex; 2],
    label: &str,
    role: NodeRole,
) -> NodeIndex {
    let [first, second] = branches;
    let joined = graph.add_node(Shape::Process, label, role);
    graph.add_edge(first, joined, None);
    graph.add_edge(second, joined, None);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    use codeflow_core::features::Feature;

    fn labels(graph: &FlowGraph) -> Vec<&str> {
        graph.nodes().filter_map(|node| node.label()).collect()
    }

    #[test]
    fn test_no_features_is_a_chain() {
        let graph = build(FeatureFlags::none());
        assert_eq!(
            labels(&graph),
            [
                "Program Start",
                "Initialize Variables",
                "Main Execution",
                "Process Results",
                "Generate Output",
                "Program End"
            ]
        );
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.decision_count(), 0);
        assert_eq!(graph.cycle_count(), 0);
    }

    #[test]
    fn test_every_feature() {
        let graph = build(FeatureFlags::all());
        assert_eq!(graph.node_count(), 16);
        assert_eq!(graph.edge_count(), 18);
        assert_eq!(graph.decision_count(), 3);
        assert_eq!(graph.cycle_count(), 1);
    }

    #[test]
    fn test_function_adds_one_linear_node() {
        let plain = build(FeatureFlags::none());
        let with_function = build(FeatureFlags::none().with(Feature::Function, true));
        assert_eq!(with_function.node_count(), plain.node_count() + 1);
        assert_eq!(with_function.decision_count(), 0);
        assert_eq!(labels(&with_function)[2], "Define Functions and Classes");
    }

    #[test]
    fn test_async_adds_no_structure() {
        let plain = build(FeatureFlags::none());
        let with_async = build(FeatureFlags::none().with(Feature::Async, true));
        assert_eq!(labels(&with_async), labels(&plain));
    }

    #[test]
    fn test_single_decision_per_block() {
        for feature in [Feature::Condition, Feature::Loop, Feature::TryCatch] {
            let graph = build(FeatureFlags::none().with(feature, true));
            assert_eq!(graph.decision_count(), 1, "{feature}");
            assert_eq!(graph.node_count(), 9, "{feature}");
        }
    }
}
