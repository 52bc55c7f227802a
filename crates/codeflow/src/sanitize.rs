//! Label sanitization for model-generated diagrams.
//!
//! The [`Sanitizer`] rewrites the content of every bracketed label into the
//! label grammar: ASCII letters, digits and single spaces, at most 30
//! characters inside `[...]` and 20 inside `{...}`. Everything outside the
//! labels is left exactly as it was.
//!
//! # Pipeline
//!
//! ```text
//! label content
//!     ↓ rewrite rules (indexing, operators, identifiers, calls, punctuation)
//!     ↓ scrub characters the rules left behind
//!     ↓ collapse whitespace
//!     ↓ cap: overlong labels become a short generic phrase
//! clean label
//! ```
//!
//! # Example
//!
//! ```
//! use codeflow::sanitize::sanitize;
//!
//! let diagram = "graph TD;\n    A[x[i] = x[i] + 1] --> B{i < n}";
//! assert_eq!(sanitize(diagram), "graph TD;\n    A[Increment] --> B{i lt n}");
//! ```

mod rules;
mod scan;
mod summary;

use std::{borrow::Cow, sync::LazyLock};

use log::{debug, trace};

use codeflow_core::flowchart::{LabelLimits, Shape, is_label_char};

use crate::config::SanitizerConfig;

use rules::RuleTable;
use scan::Segment;
use summary::{DECISION_FALLBACK, PROCESS_FALLBACK, Summary};

static DEFAULT_SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::default);

/// Sanitize `diagram` with the default configuration.
///
/// Never fails. See [`Sanitizer::sanitize`].
pub fn sanitize(diagram: &str) -> String {
    DEFAULT_SANITIZER.sanitize(diagram)
}

/// Rewrites diagram labels into the label grammar.
///
/// Built once per configuration; rule tables are compiled in
/// [`Sanitizer::new`] and shared by every call.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    process: RuleTable,
    decision: RuleTable,
    summary: Summary,
    limits: LabelLimits,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(&SanitizerConfig::default())
    }
}

impl Sanitizer {
    /// Create a sanitizer from its configuration.
    pub fn new(config: &SanitizerConfig) -> Self {
        let vocabulary = config.vocabulary();
        Self {
            process: RuleTable::process(vocabulary),
            decision: RuleTable::decision(vocabulary),
            summary: Summary::new(vocabulary),
            limits: config.limits(),
        }
    }

    /// Sanitize every label of `diagram`.
    ///
    /// Lines without a matching bracket pair pass through verbatim. The
    /// result is trimmed.
    pub fn sanitize(&self, diagram: &str) -> String {
        let mut labels = 0;
        let lines: Vec<Cow<'_, str>> = diagram
            .split('\n')
            .map(|line| self.sanitize_line(line, &mut labels))
            .collect();

        debug!(lines = lines.len(), labels; "Sanitized diagram");
        lines.join("\n").trim().to_string()
    }

    fn sanitize_line<'a>(&self, line: &'a str, labels: &mut usize) -> Cow<'a, str> {
        let segments = scan::segments(line);
        if !segments
            .iter()
            .any(|segment| matches!(segment, Segment::Label { .. }))
        {
            return Cow::Borrowed(line);
        }

        let mut out = String::with_capacity(line.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Label { shape, content } => {
                    *labels += 1;
                    out.push(shape.open());
                    out.push_str(&self.sanitize_label(shape, content));
                    out.push(shape.close());
                }
            }
        }
        Cow::Owned(out)
    }

    /// Sanitize the content of a single label of the given shape.
    ///
    /// An empty label stays empty; content that rewrites to nothing becomes
    /// a generic phrase.
    pub fn sanitize_label(&self, shape: Shape, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let table = match shape {
            Shape::Process => &self.process,
            Shape::Decision => &self.decision,
        };
        let rewritten = table.apply(content);
        let cleaned = collapse_whitespace(&scrub(&rewritten));

        let label = if cleaned.is_empty() {
            match shape {
                Shape::Process => PROCESS_FALLBACK.to_string(),
                Shape::Decision => DECISION_FALLBACK.to_string(),
            }
        } else if cleaned.chars().count() > self.limits.for_shape(shape) {
            match shape {
                Shape::Process => self.summary.summarize(&cleaned).to_string(),
                Shape::Decision => DECISION_FALLBACK.to_string(),
            }
        } else {
            cleaned
        };

        trace!(shape:?, content, label:%; "Sanitized label");
        label
    }
}

/// Replace characters outside the label alphabet with spaces.
fn scrub(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_label_char) {
        return Cow::Borrowed(text);
    }

    let residual: String = text.chars().filter(|c| !is_label_char(*c)).collect();
    debug!(residual:?; "Rewrite rules left characters outside the label alphabet");
    Cow::Owned(
        text.chars()
            .map(|c| if is_label_char(c) { c } else { ' ' })
            .collect(),
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
