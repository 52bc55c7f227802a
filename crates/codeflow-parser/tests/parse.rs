use codeflow_core::flowchart::{Direction, Shape, Statement};
use codeflow_parser::{check, error::ErrorCode, parse};
use proptest::prelude::*;

#[test]
fn test_simple_chain() {
    let source = "graph TD\n    A[Start] --> B[Process data]\n    B --> C[End]";

    let flowchart = parse(source).expect("Failed to parse");

    assert_eq!(flowchart.direction(), Direction::TopDown);
    assert_eq!(flowchart.statements().len(), 2);

    let ids: Vec<String> = flowchart.node_ids().iter().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn test_branching_diagram() {
    let source = r#"graph TD;
        A[Start] --> B{Check value}
        B -->|Yes| C[Handle positive]
        B -->|No| D[Handle negative]
        C --> E[End]
        D --> E"#;

    let flowchart = parse(source).expect("Failed to parse");

    let edges: Vec<_> = flowchart.edges().collect();
    assert_eq!(edges.len(), 5);

    // Decision node declared inline on first mention
    let decision = edges[0].to();
    assert_eq!(decision.shape(), Some(Shape::Decision));
    assert_eq!(decision.label(), Some("Check value"));

    assert_eq!(edges[1].label(), Some("Yes"));
    assert_eq!(edges[2].label(), Some("No"));
    assert_eq!(edges[4].label(), None);
}

#[test]
fn test_style_statements_are_kept() {
    let source = "graph TD\nA[Start] --> B[End]\nclassDef startEnd fill:#e1f5fe\nclass A,B startEnd";

    let flowchart = parse(source).expect("Failed to parse");

    let styles: Vec<_> = flowchart
        .statements()
        .iter()
        .filter_map(|statement| match statement {
            Statement::Style(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(styles, vec!["classDef startEnd fill:#e1f5fe", "class A,B startEnd"]);
}

#[test]
fn test_raw_code_labels_are_rejected() {
    let source = "graph TD\nA[for i in range(len(nums))] --> B{nums[i] > 0}";

    let err = parse(source).expect_err("Raw code should not parse");

    assert!(
        err.errors()
            .all(|diagnostic| diagnostic.code() == Some(ErrorCode::E100)
                || diagnostic.code() == Some(ErrorCode::E201))
    );
    assert!(err.errors().count() >= 1);
}

#[test]
fn test_check_reports_warnings() {
    let checked = check("graph TD\nB[Start] --> A[End]").expect("Warnings should not fail");
    assert_eq!(checked.warnings().len(), 1);
    assert_eq!(checked.warnings()[0].code(), Some(ErrorCode::E300));
}

fn label(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z0-9]{1,6}", 1..5)
        .prop_map(|words| words.join(" "))
        .prop_filter("label within bound", move |text| text.len() <= max)
}

proptest! {
    #[test]
    fn chains_of_valid_labels_parse(labels in prop::collection::vec(label(30), 1..12)) {
        let mut source = String::from("graph TD\n");
        source.push_str(&format!("    A[{}]\n", labels[0]));
        for (i, text) in labels.iter().enumerate().skip(1) {
            let from = (b'A' + (i - 1) as u8) as char;
            let to = (b'A' + i as u8) as char;
            source.push_str(&format!("    {from} --> {to}[{text}]\n"));
        }

        let checked = check(&source).expect("Valid chain should parse");
        prop_assert!(checked.warnings().is_empty());
        prop_assert_eq!(checked.flowchart().node_ids().len(), labels.len());
    }

    #[test]
    fn decision_labels_parse(text in label(20)) {
        let source = format!("graph TD\nA{{{text}}} -->|Yes| B[Done]");
        prop_assert!(parse(&source).is_ok());
    }

    #[test]
    fn check_never_panics(source in ".{0,200}") {
        let _ = check(&source);
    }
}
