//! Configuration types for Codeflow.
//!
//! This module provides configuration structures that control label
//! sanitization, fallback synthesis and the analysis history. All types
//! implement [`serde::Deserialize`] for loading from external sources, and
//! every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`SanitizerConfig`] - Label bounds and the operator [`Vocabulary`].
//! - [`FallbackConfig`] - Options for synthesized diagrams.
//! - [`HistoryConfig`] - Size and persistence of the recent-analysis list.
//!
//! # Example
//!
//! ```
//! # use codeflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sanitizer().vocabulary().not_equals(), "not equals");
//! ```

use serde::Deserialize;

use codeflow_core::flowchart::LabelLimits;

/// Shortest process bound that still fits every replacement phrase.
const MIN_PROCESS_LIMIT: usize = 15;

/// Shortest decision bound that still fits `condition`.
const MIN_DECISION_LIMIT: usize = 9;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Sanitizer configuration section.
    #[serde(default)]
    sanitizer: SanitizerConfig,

    /// Fallback configuration section.
    #[serde(default)]
    fallback: FallbackConfig,

    /// History configuration section.
    #[serde(default)]
    history: HistoryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(sanitizer: SanitizerConfig, fallback: FallbackConfig, history: HistoryConfig) -> Self {
        Self {
            sanitizer,
            fallback,
            history,
        }
    }

    /// Returns the sanitizer configuration.
    pub fn sanitizer(&self) -> &SanitizerConfig {
        &self.sanitizer
    }

    /// Returns the fallback configuration.
    pub fn fallback(&self) -> &FallbackConfig {
        &self.fallback
    }

    /// Returns the history configuration.
    pub fn history(&self) -> &HistoryConfig {
        &self.history
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.sanitizer.validate()?;
        self.history.validate()
    }
}

/// Label sanitizer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Maximum length of `[...]` labels.
    process_limit: usize,

    /// Maximum length of `{...}` labels.
    decision_limit: usize,

    /// Words substituted for operators.
    vocabulary: Vocabulary,
}

impl SanitizerConfig {
    /// Creates a sanitizer configuration.
    pub fn new(limits: LabelLimits, vocabulary: Vocabulary) -> Self {
        Self {
            process_limit: limits.process(),
            decision_limit: limits.decision(),
            vocabulary,
        }
    }

    /// Returns the configured label bounds.
    pub fn limits(&self) -> LabelLimits {
        LabelLimits::new(self.process_limit, self.decision_limit)
    }

    /// Returns the operator vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn validate(&self) -> Result<(), String> {
        let grammar = LabelLimits::GRAMMAR;
        if !(MIN_PROCESS_LIMIT..=grammar.process()).contains(&self.process_limit) {
            return Err(format!(
                "sanitizer.process_limit must be between {MIN_PROCESS_LIMIT} and {}, got {}",
                grammar.process(),
                self.process_limit
            ));
        }
        if !(MIN_DECISION_LIMIT..=grammar.decision()).contains(&self.decision_limit) {
            return Err(format!(
                "sanitizer.decision_limit must be between {MIN_DECISION_LIMIT} and {}, got {}",
                grammar.decision(),
                self.decision_limit
            ));
        }
        self.vocabulary.validate()
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self::new(LabelLimits::GRAMMAR, Vocabulary::default())
    }
}

/// The words operators are rewritten to.
///
/// One table serves both label kinds. The defaults are the strict wording
/// (`not equals`, `floor div`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    less_than: String,
    greater_than: String,
    less_equal: String,
    greater_equal: String,
    equals: String,
    not_equals: String,
    assign: String,
    increment: String,
    decrement: String,
    power: String,
    plus: String,
    minus: String,
    times: String,
    floor_div: String,
    div: String,
    modulo: String,
    and: String,
    or: String,
    xor: String,
    not: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            less_than: "lt".to_string(),
            greater_than: "gt".to_string(),
            less_equal: "lt equals".to_string(),
            greater_equal: "gt equals".to_string(),
            equals: "equals".to_string(),
            not_equals: "not equals".to_string(),
            assign: "assign".to_string(),
            increment: "increment".to_string(),
            decrement: "decrement".to_string(),
            power: "power".to_string(),
            plus: "plus".to_string(),
            minus: "minus".to_string(),
            times: "times".to_string(),
            floor_div: "floor div".to_string(),
            div: "div".to_string(),
            modulo: "mod".to_string(),
            and: "and".to_string(),
            or: "or".to_string(),
            xor: "xor".to_string(),
            not: "not".to_string(),
        }
    }
}

impl Vocabulary {
    pub fn less_than(&self) -> &str {
        &self.less_than
    }

    pub fn greater_than(&self) -> &str {
        &self.greater_than
    }

    pub fn less_equal(&self) -> &str {
        &self.less_equal
    }

    pub fn greater_equal(&self) -> &str {
        &self.greater_equal
    }

    pub fn equals(&self) -> &str {
        &self.equals
    }

    pub fn not_equals(&self) -> &str {
        &self.not_equals
    }

    pub fn assign(&self) -> &str {
        &self.assign
    }

    pub fn increment(&self) -> &str {
        &self.increment
    }

    pub fn decrement(&self) -> &str {
        &self.decrement
    }

    pub fn power(&self) -> &str {
        &self.power
    }

    pub fn plus(&self) -> &str {
        &self.plus
    }

    pub fn minus(&self) -> &str {
        &self.minus
    }

    pub fn times(&self) -> &str {
        &self.times
    }

    pub fn floor_div(&self) -> &str {
        &self.floor_div
    }

    pub fn div(&self) -> &str {
        &self.div
    }

    pub fn modulo(&self) -> &str {
        &self.modulo
    }

    pub fn and(&self) -> &str {
        &self.and
    }

    pub fn or(&self) -> &str {
        &self.or
    }

    pub fn xor(&self) -> &str {
        &self.xor
    }

    pub fn not(&self) -> &str {
        &self.not
    }

    /// Every entry with its configuration key.
    fn entries(&self) -> [(&'static str, &str); 20] {
        [
            ("less_than", &self.less_than),
            ("greater_than", &self.greater_than),
            ("less_equal", &self.less_equal),
            ("greater_equal", &self.greater_equal),
            ("equals", &self.equals),
            ("not_equals", &self.not_equals),
            ("assign", &self.assign),
            ("increment", &self.increment),
            ("decrement", &self.decrement),
            ("power", &self.power),
            ("plus", &self.plus),
            ("minus", &self.minus),
            ("times", &self.times),
            ("floor_div", &self.floor_div),
            ("div", &self.div),
            ("modulo", &self.modulo),
            ("and", &self.and),
            ("or", &self.or),
            ("xor", &self.xor),
            ("not", &self.not),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        for (key, word) in self.entries() {
            let well_formed = !word.is_empty()
                && word.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
                && !word.starts_with(' ')
                && !word.ends_with(' ')
                && !word.contains("  ");
            if !well_formed {
                return Err(format!(
                    "sanitizer.vocabulary.{key} must be letters separated by single spaces, got {word:?}"
                ));
            }
        }
        Ok(())
    }
}

/// Fallback synthesis configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Whether synthesized diagrams end with the class style block.
    include_styles: bool,
}

impl FallbackConfig {
    /// Creates a fallback configuration.
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    /// Returns whether the style block is emitted.
    pub fn include_styles(&self) -> bool {
        self.include_styles
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            include_styles: true,
        }
    }
}

/// Analysis history configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether analyses are recorded at all.
    enabled: bool,

    /// Number of entries kept, newest first.
    capacity: usize,
}

impl HistoryConfig {
    /// Creates a history configuration.
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self { enabled, capacity }
    }

    /// Returns whether analyses are recorded.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("history.capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 5,
        }
    }
}
