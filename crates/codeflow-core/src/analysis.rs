//! The explanation and diagram pair handed to the rendering layer.
//!
//! [`Analysis`] serializes to the JSON shape consumers expect:
//!
//! ```json
//! {
//!   "explanation": [{"line": "x = 1", "explanation": "assigns one"}],
//!   "diagram": "graph TD\n    A[Start] --> B[End]",
//!   "source": "model"
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Explanation of a single source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    line: String,
    explanation: String,
}

impl ExplanationEntry {
    /// Creates an entry.
    pub fn new(line: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            explanation: explanation.into(),
        }
    }

    /// The source line being explained.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The explanation text.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Explanation text: either free-form or line by line.
///
/// No grammar constraint applies to explanations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Explanation {
    /// Free-form text, usually markdown.
    Text(String),
    /// One entry per explained line.
    Lines(Vec<ExplanationEntry>),
}

impl Explanation {
    /// Returns `true` when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        match self {
            Explanation::Text(text) => text.trim().is_empty(),
            Explanation::Lines(lines) => lines.is_empty(),
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Explanation::Text(text) => f.write_str(text),
            Explanation::Lines(lines) => {
                for (i, entry) in lines.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}\n    {}", entry.line, entry.explanation)?;
                }
                Ok(())
            }
        }
    }
}

/// Where the diagram of an [`Analysis`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Model output, sanitized.
    Model,
    /// Synthesized locally because model output was unusable.
    Offline,
}

/// A complete explanation and diagram pair.
///
/// The diagram is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    explanation: Explanation,
    diagram: String,
    source: AnalysisSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

impl Analysis {
    /// Creates an analysis.
    pub fn new(explanation: Explanation, diagram: String, source: AnalysisSource) -> Self {
        Self {
            explanation,
            diagram,
            source,
            notice: None,
        }
    }

    /// Attaches a user-visible notice.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    pub fn diagram(&self) -> &str {
        &self.diagram
    }

    pub fn source(&self) -> AnalysisSource {
        self.source
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
