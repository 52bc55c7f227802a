//! Deterministic fallback diagrams synthesized from source code.
//!
//! When no usable diagram comes back from the model, the [`Synthesizer`]
//! derives one from the submitted source alone: five feature patterns decide
//! which blocks are added to a fixed topology, and the resulting graph is
//! emitted as Mermaid text. Synthesis is total; any input, including empty
//! or binary text, yields a diagram that passes the grammar check.
//!
//! # Example
//!
//! ```
//! use codeflow::fallback::synthesize;
//!
//! let diagram = synthesize("for i in range(5): print(i)");
//! assert!(diagram.starts_with("graph TD\n"));
//! assert!(diagram.contains("-->|Continue|"));
//! assert!(!diagram.contains("Conditional Logic"));
//! ```

mod detect;
mod topology;

use log::info;

use codeflow_core::features::FeatureFlags;

use crate::{config::FallbackConfig, export::Mermaid, structure::FlowGraph};

/// Synthesize a fallback diagram with the default configuration.
pub fn synthesize(source: &str) -> String {
    Synthesizer::default().synthesize(source)
}

/// Detect the structural features of `source`.
pub fn features(source: &str) -> FeatureFlags {
    detect::detect(source)
}

/// Builds fallback diagrams from source text.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: FallbackConfig,
}

impl Synthesizer {
    /// Create a synthesizer from its configuration.
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Build the fallback graph for `source`.
    pub fn graph(&self, source: &str) -> FlowGraph {
        topology::build(features(source))
    }

    /// Synthesize the fallback diagram text for `source`.
    pub fn synthesize(&self, source: &str) -> String {
        let graph = self.graph(source);
        info!(
            nodes = graph.node_count(),
            decisions = graph.decision_count();
            "Synthesized fallback diagram"
        );
        Mermaid::new(&graph)
            .with_styles(self.config.include_styles())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn check_clean(diagram: &str) {
        let checked = codeflow_parser::check(diagram).expect("fallback diagram checks");
        assert!(checked.warnings().is_empty(), "{:?}", checked.warnings());
    }

    #[test]
    fn test_range_loop() {
        let diagram = synthesize("for i in range(5): print(i)");
        let expected = "graph TD
    A[Program Start] --> B[Initialize Variables]
    B --> C[Main Execution]
    C --> D[Process Results]
    D --> E{Loop Condition}
    E -->|Continue| F[Loop Body]
    F --> G[Update Variables]
    G --> E
    E -->|Exit| H[Generate Output]
    H --> I[Program End]";

        let without_styles = Synthesizer::new(&FallbackConfig::new(false))
            .synthesize("for i in range(5): print(i)");
        assert_eq!(without_styles, expected);
        assert!(diagram.starts_with(expected));
        assert!(diagram.contains("    class F,G loop"));
        check_clean(&diagram);
    }

    #[test]
    fn test_every_block() {
        let source = "class Worker:\n    def run(self):\n        for job in self.jobs:\n            if job.ready:\n                try:\n                    await job.start()\n                except Exception:\n                    pass";
        let synthesizer = Synthesizer::default();
        assert_eq!(features(source), FeatureFlags::all());

        let diagram = synthesizer.synthesize(source);
        for label in [
            "C[Define Functions and Classes]",
            "E{Conditional Logic}",
            "E -->|True| F[Execute Branch A]",
            "E -->|False| G[Execute Branch B]",
            "G --> H",
            "I -->|Continue| J[Loop Body]",
            "K --> I",
            "M -->|Error| O[Error Handler]",
            "O --> P",
            "class A,P startEnd",
            "class E,I,M decision",
            "class O error",
        ] {
            assert!(diagram.contains(label), "missing {label} in {diagram}");
        }
        check_clean(&diagram);
    }

    #[test]
    fn test_empty_source_is_a_chain() {
        let diagram = Synthesizer::new(&FallbackConfig::new(false)).synthesize("");
        assert_eq!(diagram.lines().count(), 6);
        assert!(!diagram.contains('{'));
        check_clean(&diagram);
    }

    proptest! {
        #[test]
        fn synthesis_is_total_and_checks(source in any::<String>()) {
            let diagram = synthesize(&source);
            prop_assert!(codeflow_parser::check(&diagram).is_ok());
        }

        #[test]
        fn synthesis_handles_binary_garbage(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let source = String::from_utf8_lossy(&bytes);
            prop_assert!(codeflow_parser::parse(&synthesize(&source)).is_ok());
        }
    }
}
