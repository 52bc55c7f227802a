//! Offline explanation of source code.
//!
//! Produces a markdown report from surface heuristics alone: a language
//! guess, a complexity level, the structural features found by the fallback
//! patterns and a short description of the first lines. It accompanies the
//! synthesized diagram whenever the model cannot be used.

use std::{fmt::Write as _, sync::LazyLock};

use log::debug;
use regex::Regex;

use codeflow_core::{analysis::Explanation, features::FeatureFlags};

use crate::fallback;

/// Number of lines described individually.
const DESCRIBED_LINES: usize = 8;

/// Longest line quoted verbatim, in characters.
const QUOTE_WIDTH: usize = 60;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| compile(r"def |function|class"));
static CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| compile(r"if|else"));
static LOOP: LazyLock<Regex> = LazyLock::new(|| compile(r"for|while"));
static OUTPUT: LazyLock<Regex> = LazyLock::new(|| compile(r"print|console\.log|cout"));
static IMPORT: LazyLock<Regex> = LazyLock::new(|| compile(r"import|include|require"));
static COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"//|#|/\*"));
static INDENTED: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^[ \t]+\S"));

/// Programming language guessed from marker substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    Java,
    CFamily,
    Generic,
}

impl Language {
    /// Guess the language of `source`. The first matching marker wins.
    pub fn detect(source: &str) -> Self {
        if source.contains("def ") && source.contains(':') {
            Language::Python
        } else if source.contains("function") || source.contains("=>") {
            Language::JavaScript
        } else if source.contains("public class") {
            Language::Java
        } else if source.contains("#include") {
            Language::CFamily
        } else {
            Language::Generic
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
            Language::CFamily => "C/C++",
            Language::Generic => "Generic",
        }
    }

    fn style(&self) -> &'static str {
        match self {
            Language::Python => "Pythonic",
            Language::JavaScript => "modern JavaScript",
            _ => "structured",
        }
    }
}

/// Complexity level by non-empty line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// More than 50 lines is high, more than 20 medium.
    pub fn from_line_count(lines: usize) -> Self {
        match lines {
            0..=20 => Complexity::Low,
            21..=50 => Complexity::Medium,
            _ => Complexity::High,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

/// Describe what a single trimmed line does.
fn describe_line(line: &str) -> &'static str {
    if DEFINITION.is_match(line) {
        "Function/Class definition"
    } else if CONDITIONAL.is_match(line) {
        "Conditional statement"
    } else if LOOP.is_match(line) {
        "Loop construct"
    } else if line.contains("return") {
        "Return statement"
    } else if line.contains('=') && !line.contains("==") {
        "Variable assignment"
    } else if OUTPUT.is_match(line) {
        "Output statement"
    } else if IMPORT.is_match(line) {
        "Import statement"
    } else {
        "Code execution step"
    }
}

fn quote(line: &str) -> String {
    if line.chars().count() > QUOTE_WIDTH {
        let head: String = line.chars().take(QUOTE_WIDTH).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

/// Key feature names in report order.
fn key_features(source: &str, flags: FeatureFlags) -> Vec<&'static str> {
    let mut features: Vec<&'static str> = flags.detected().map(|f| f.description()).collect();
    if IMPORT.is_match(source) {
        features.push("External Dependencies");
    }
    features
}

/// Explain `source` without the model.
///
/// # Example
///
/// ```
/// use codeflow::explain::explain;
///
/// let explanation = explain("def f(x):\n    return x + 1").to_string();
/// assert!(explanation.contains("**Programming Language**: Python"));
/// assert!(explanation.contains("**Complexity Level**: Low"));
/// ```
pub fn explain(source: &str) -> Explanation {
    let lines: Vec<&str> = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let language = Language::detect(source);
    let complexity = Complexity::from_line_count(lines.len());
    let features = key_features(source, fallback::features(source));

    debug!(
        language = language.name(),
        complexity = complexity.name(),
        lines = lines.len();
        "Explaining source offline"
    );

    Explanation::Text(render(source, &lines, language, complexity, &features))
}

fn render(
    source: &str,
    lines: &[&str],
    language: Language,
    complexity: Complexity,
    features: &[&str],
) -> String {
    // Writing into a `String` cannot fail.
    let mut out = String::new();
    let feature_list = if features.is_empty() {
        "Basic Operations".to_string()
    } else {
        features.join(", ")
    };

    let _ = writeln!(out, "## Code Analysis Summary\n");
    let _ = writeln!(out, "**Programming Language**: {}", language.name());
    let _ = writeln!(out, "**Complexity Level**: {}", complexity.name());
    let _ = writeln!(out, "**Total Lines**: {}", lines.len());
    let _ = writeln!(out, "**Key Features**: {feature_list}\n");

    let _ = writeln!(out, "## Detailed Breakdown\n");
    let _ = writeln!(
        out,
        "This code demonstrates {} programming concepts with {} complexity. \
         The implementation includes:\n",
        language.name().to_lowercase(),
        complexity.name().to_lowercase()
    );
    for feature in features {
        let _ = writeln!(
            out,
            "- **{feature}**: Essential programming construct identified"
        );
    }

    let _ = writeln!(out, "\n## Code Structure Analysis\n");
    let _ = writeln!(out, "**Main Components:**\n");
    for (i, line) in lines.iter().take(DESCRIBED_LINES).enumerate() {
        let _ = writeln!(
            out,
            "**Line {}**: `{}`\n   {}\n",
            i + 1,
            quote(line),
            describe_line(line)
        );
    }
    if lines.len() > DESCRIBED_LINES {
        let _ = writeln!(
            out,
            "*... and {} additional lines with similar patterns*\n",
            lines.len() - DESCRIBED_LINES
        );
    }

    let _ = writeln!(out, "## Code Quality Insights\n");
    let _ = writeln!(
        out,
        "- **Structure**: Well-organized code structure detected"
    );
    let _ = writeln!(
        out,
        "{}",
        if COMMENT.is_match(source) {
            "- **Documentation**: Comments found for better readability"
        } else {
            "- **Documentation**: Consider adding comments for clarity"
        }
    );
    let _ = writeln!(
        out,
        "{}",
        if INDENTED.is_match(source) {
            "- **Formatting**: Proper indentation maintained"
        } else {
            "- **Formatting**: Check indentation consistency"
        }
    );
    let _ = writeln!(
        out,
        "{}\n",
        if features.len() > 2 {
            "- **Complexity**: Good use of programming constructs"
        } else {
            "- **Complexity**: Simple and straightforward implementation"
        }
    );

    let _ = writeln!(out, "## Execution Flow\n");
    let _ = write!(
        out,
        "The program follows a {}-complexity execution pattern with {} major \
         programming concepts implemented. The code structure suggests a {} \
         approach to problem-solving.",
        complexity.name().to_lowercase(),
        features.len(),
        language.style()
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACTORIAL: &str = r#"def factorial(n):
    """Calculate factorial of a number recursively"""
    if n <= 1:
        return 1
    else:
        return n * factorial(n - 1)

# Test the function
result = factorial(5)
print(f"Factorial of 5 is: {result}")

# Calculate factorials for a range
for i in range(1, 6):
    print(f"{i}! = {factorial(i)}")"#;

    fn text(explanation: Explanation) -> String {
        match explanation {
            Explanation::Text(text) => text,
            Explanation::Lines(_) => panic!("offline explanations are text"),
        }
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(Language::detect("def f():\n  pass"), Language::Python);
        assert_eq!(Language::detect("const f = () => 1"), Language::JavaScript);
        assert_eq!(Language::detect("public class Main {}"), Language::Java);
        assert_eq!(Language::detect("#include <stdio.h>"), Language::CFamily);
        assert_eq!(Language::detect("SELECT 1"), Language::Generic);
    }

    #[test]
    fn test_complexity_bounds() {
        assert_eq!(Complexity::from_line_count(20), Complexity::Low);
        assert_eq!(Complexity::from_line_count(21), Complexity::Medium);
        assert_eq!(Complexity::from_line_count(50), Complexity::Medium);
        assert_eq!(Complexity::from_line_count(51), Complexity::High);
    }

    #[test]
    fn test_line_descriptions() {
        assert_eq!(describe_line("def run(self):"), "Function/Class definition");
        assert_eq!(describe_line("if x > 0:"), "Conditional statement");
        assert_eq!(describe_line("while True:"), "Loop construct");
        assert_eq!(describe_line("return total"), "Return statement");
        assert_eq!(describe_line("total = 0"), "Variable assignment");
        assert_eq!(describe_line("print(total)"), "Output statement");
        assert_eq!(describe_line("import os"), "Import statement");
        assert_eq!(describe_line("x == y"), "Code execution step");
    }

    #[test]
    fn test_factorial_report() {
        let report = text(explain(FACTORIAL));
        assert!(report.contains("**Programming Language**: Python"));
        assert!(report.contains("**Total Lines**: 12"));
        assert!(report.contains("Iterative Loops, Conditional Logic, Function/Class Definitions"));
        assert!(report.contains("**Line 1**: `def factorial(n):`\n   Function/Class definition"));
        assert!(report.contains("*... and 4 additional lines with similar patterns*"));
        assert!(report.contains("Comments found"));
        assert!(report.contains("Proper indentation maintained"));
        assert!(report.contains("a Pythonic approach"));
        assert!(!report.contains("**Line 9**"));
    }

    #[test]
    fn test_long_lines_are_shortened() {
        let line = "x".repeat(70);
        let report = text(explain(&line));
        assert!(report.contains(&format!("`{}...`", "x".repeat(60))));
    }

    #[test]
    fn test_empty_source() {
        let report = text(explain(""));
        assert!(report.contains("**Total Lines**: 0"));
        assert!(report.contains("**Key Features**: Basic Operations"));
        assert!(report.contains("Consider adding comments"));
    }
}
