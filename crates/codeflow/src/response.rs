//! Decoding of raw model replies.
//!
//! The model is asked for a JSON object with an `explanation` and a `diagram`
//! field, but replies arrive wrapped in markdown fences, surrounded by prose
//! or as almost-JSON. [`decode`] tries, in order:
//!
//! 1. the whole reply, after stripping a leading and trailing fence line;
//! 2. the outermost `{...}` block of the reply;
//! 3. salvaging the two string fields by pattern.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use codeflow_core::analysis::Explanation;

const FENCE: &str = "```";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static EXPLANATION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?s)"explanation"\s*:\s*"((?:[^"\\]|\\.)*)""#));
static DIAGRAM_FIELD: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?s)"diagram"\s*:\s*"((?:[^"\\]|\\.)*)""#));

/// A decoded model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    explanation: Option<Explanation>,
    diagram: String,
    salvaged: bool,
}

impl ModelReply {
    /// The explanation, if the reply carried a non-empty one.
    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    /// The raw, unsanitized diagram text. Never blank.
    pub fn diagram(&self) -> &str {
        &self.diagram
    }

    /// Whether the fields were recovered by pattern from invalid JSON.
    pub fn salvaged(&self) -> bool {
        self.salvaged
    }

    /// Splits the reply into its explanation and diagram.
    pub fn into_parts(self) -> (Option<Explanation>, String) {
        (self.explanation, self.diagram)
    }
}

/// Why a reply could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("model reply is not a JSON object and no fields could be recovered")]
    Malformed,

    #[error("model reply has no usable diagram")]
    MissingDiagram { explanation: Option<Explanation> },
}

/// Decode a raw model reply.
///
/// # Errors
///
/// Returns [`DecodeError::MissingDiagram`] when the reply decodes but its
/// diagram is absent, not a string or blank; any explanation found is kept.
/// Returns [`DecodeError::Malformed`] when nothing can be recovered.
pub fn decode(raw: &str) -> Result<ModelReply, DecodeError> {
    let text = strip_fences(raw);

    if let Some(object) = parse_object(&text) {
        return from_object(&object);
    }

    salvage(&text)
}

/// Remove a leading and a trailing markdown fence line.
fn strip_fences(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().is_some_and(|line| line.starts_with(FENCE)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.starts_with(FENCE)) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

/// Parse `text` as a JSON object, falling back to its outermost braces.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) {
        return Some(object);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => {
            debug!("Decoded model reply from its outermost braces");
            Some(object)
        }
        Ok(_) => None,
        Err(err) => {
            debug!(err:%; "Model reply is not valid JSON");
            None
        }
    }
}

fn from_object(object: &Map<String, Value>) -> Result<ModelReply, DecodeError> {
    let explanation = object
        .get("explanation")
        .and_then(|value| serde_json::from_value::<Explanation>(value.clone()).ok())
        .filter(|explanation| !explanation.is_empty());

    let diagram = object
        .get("diagram")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|diagram| !diagram.is_empty());

    match diagram {
        Some(diagram) => Ok(ModelReply {
            explanation,
            diagram: diagram.to_string(),
            salvaged: false,
        }),
        None => Err(DecodeError::MissingDiagram { explanation }),
    }
}

fn string_field(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .map(|caps| unescape(&caps[1]).trim().to_string())
        .filter(|value| !value.is_empty())
}

fn salvage(text: &str) -> Result<ModelReply, DecodeError> {
    let explanation = string_field(&EXPLANATION_FIELD, text).map(Explanation::Text);
    match (string_field(&DIAGRAM_FIELD, text), explanation) {
        (Some(diagram), explanation) => {
            warn!("Recovered model reply fields from invalid JSON");
            Ok(ModelReply {
                explanation,
                diagram,
                salvaged: true,
            })
        }
        (None, Some(explanation)) => Err(DecodeError::MissingDiagram {
            explanation: Some(explanation),
        }),
        (None, None) => Err(DecodeError::Malformed),
    }
}

/// Resolve JSON string escapes; unknown escapes keep the escaped character.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
