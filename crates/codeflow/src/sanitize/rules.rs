//! Ordered rewrite rules applied to label content.
//!
//! A [`RuleTable`] is an explicit list of named rules evaluated in order.
//! Order carries meaning: indexing runs before bracket stripping, and every
//! multi-character operator runs before its single-character prefix.

use std::sync::LazyLock;

use log::trace;
use regex::{Captures, NoExpand, Regex};

use crate::config::Vocabulary;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static INDEXED: LazyLock<Regex> = LazyLock::new(|| compile(r"\w+\[[^\[\]]*\]"));
static BARE_INDEX: LazyLock<Regex> = LazyLock::new(|| compile(r"\[[^\[\]]*\]"));
static SNAKE_CASE: LazyLock<Regex> = LazyLock::new(|| compile(r"\w+_\w+"));
static LEN_CALL: LazyLock<Regex> = LazyLock::new(|| compile(r"\blen\([^)]*\)"));
static RANGE_CALL: LazyLock<Regex> = LazyLock::new(|| compile(r"\brange\([^)]*\)"));
static METHOD_CALL: LazyLock<Regex> = LazyLock::new(|| compile(r"\.\w+\(\)"));
static MEMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"[A-Za-z_]\w*\.[A-Za-z_]\w*"));
static CALL: LazyLock<Regex> = LazyLock::new(|| compile(r"\w+\([^()]*\)"));
static EMPTY_PARENS: LazyLock<Regex> = LazyLock::new(|| compile(r"\(\s*\)"));
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| compile(r#"[()\[\]{}:;,?!@#$"'`]"#));

/// What a rule looks for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Matcher {
    /// A literal token such as `>=`.
    Literal(&'static str),
    /// A pattern replaced in one pass.
    Pattern(&'static Regex),
    /// A pattern replaced until it no longer matches, for nested brackets.
    Nested(&'static Regex),
}

/// What a match is rewritten to.
#[derive(Debug, Clone)]
pub(crate) enum Replacement {
    /// A word, padded with spaces so it never fuses with its neighbors.
    Word(String),
    /// Text inserted as is.
    Text(&'static str),
    /// Underscores inside the match become spaces.
    Despace,
}

/// One named rewrite step.
#[derive(Debug, Clone)]
pub(crate) struct RewriteRule {
    name: &'static str,
    matcher: Matcher,
    replacement: Replacement,
}

impl RewriteRule {
    fn new(name: &'static str, matcher: Matcher, replacement: Replacement) -> Self {
        Self {
            name,
            matcher,
            replacement,
        }
    }

    fn word(name: &'static str, matcher: Matcher, word: &str) -> Self {
        Self::new(name, matcher, Replacement::Word(format!(" {word} ")))
    }

    fn removal(name: &'static str, matcher: Matcher) -> Self {
        Self::new(name, matcher, Replacement::Text(""))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule to `text`.
    pub fn apply(&self, text: String) -> String {
        match self.matcher {
            Matcher::Literal(token) => {
                if !text.contains(token) {
                    return text;
                }
                match &self.replacement {
                    Replacement::Word(word) => text.replace(token, word),
                    Replacement::Text(with) => text.replace(token, with),
                    Replacement::Despace => text.replace(token, &token.replace('_', " ")),
                }
            }
            Matcher::Pattern(regex) => self.replace_all(regex, text),
            Matcher::Nested(regex) => {
                let mut text = text;
                // Every pass removes one bracket pair, so this terminates.
                while regex.is_match(&text) {
                    text = self.replace_all(regex, text);
                }
                text
            }
        }
    }

    fn replace_all(&self, regex: &Regex, text: String) -> String {
        if !regex.is_match(&text) {
            return text;
        }
        match &self.replacement {
            Replacement::Word(word) => regex.replace_all(&text, NoExpand(word.as_str())).into_owned(),
            Replacement::Text(with) => regex.replace_all(&text, NoExpand(*with)).into_owned(),
            Replacement::Despace => regex
                .replace_all(&text, |caps: &Captures<'_>| caps[0].replace('_', " "))
                .into_owned(),
        }
    }
}

/// An ordered list of rewrite rules.
#[derive(Debug, Clone)]
pub(crate) struct RuleTable {
    rules: Vec<RewriteRule>,
}

impl RuleTable {
    /// Full cascade for `[...]` labels.
    pub fn process(vocabulary: &Vocabulary) -> Self {
        let mut rules = vec![
            RewriteRule::word("indexed access", Matcher::Nested(&INDEXED), "array element"),
            RewriteRule::word("bare index", Matcher::Nested(&BARE_INDEX), "element"),
        ];
        rules.extend(operator_rules(vocabulary));
        rules.extend(identifier_rules(true));
        rules.extend([
            RewriteRule::word("len call", Matcher::Pattern(&LEN_CALL), "length"),
            RewriteRule::word("range call", Matcher::Pattern(&RANGE_CALL), "range"),
            RewriteRule::new(
                "method call",
                Matcher::Pattern(&METHOD_CALL),
                Replacement::Text(" method"),
            ),
            RewriteRule::word("member access", Matcher::Pattern(&MEMBER), "property"),
            RewriteRule::word("function call", Matcher::Nested(&CALL), "function call"),
            RewriteRule::removal("empty parentheses", Matcher::Pattern(&EMPTY_PARENS)),
        ]);
        rules.extend(punctuation_rules(vocabulary));
        Self { rules }
    }

    /// Lighter cascade for `{...}` labels.
    pub fn decision(vocabulary: &Vocabulary) -> Self {
        let mut rules = vec![
            RewriteRule::word("indexed access", Matcher::Nested(&INDEXED), "check array"),
            RewriteRule::word("bare index", Matcher::Nested(&BARE_INDEX), "element"),
        ];
        rules.extend(operator_rules(vocabulary));
        rules.extend(identifier_rules(false));
        rules.extend(punctuation_rules(vocabulary));
        Self { rules }
    }

    /// Run every rule in order.
    pub fn apply(&self, content: &str) -> String {
        self.rules().iter().fold(content.to_string(), |text, rule| {
            let rewritten = rule.apply(text);
            trace!(rule = rule.name(), text = rewritten.as_str(); "Applied rewrite rule");
            rewritten
        })
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }
}

fn operator_rules(v: &Vocabulary) -> Vec<RewriteRule> {
    use Matcher::Literal;

    vec![
        RewriteRule::word("less or equal", Literal("<="), v.less_equal()),
        RewriteRule::word("greater or equal", Literal(">="), v.greater_equal()),
        RewriteRule::word("equality", Literal("=="), v.equals()),
        RewriteRule::word("inequality", Literal("!="), v.not_equals()),
        RewriteRule::word("less than", Literal("<"), v.less_than()),
        RewriteRule::word("greater than", Literal(">"), v.greater_than()),
        RewriteRule::word("add assign", Literal("+="), v.increment()),
        RewriteRule::word("subtract assign", Literal("-="), v.decrement()),
        RewriteRule::word("assignment", Literal("="), v.assign()),
        RewriteRule::word("increment", Literal("++"), v.increment()),
        RewriteRule::word("decrement", Literal("--"), v.decrement()),
        RewriteRule::word("power", Literal("**"), v.power()),
        RewriteRule::word("plus", Literal("+"), v.plus()),
        RewriteRule::word("minus", Literal("-"), v.minus()),
        RewriteRule::word("times", Literal("*"), v.times()),
        RewriteRule::word("floor division", Literal("//"), v.floor_div()),
        RewriteRule::word("division", Literal("/"), v.div()),
        RewriteRule::word("modulo", Literal("%"), v.modulo()),
    ]
}

fn identifier_rules(snake_case: bool) -> Vec<RewriteRule> {
    let mut rules = vec![
        RewriteRule::new("nums prefix", Matcher::Literal("nums_"), Replacement::Despace),
        RewriteRule::new("res prefix", Matcher::Literal("res_"), Replacement::Despace),
    ];
    if snake_case {
        rules.push(RewriteRule::new(
            "snake case",
            Matcher::Pattern(&SNAKE_CASE),
            Replacement::Despace,
        ));
    }
    rules
}

fn punctuation_rules(v: &Vocabulary) -> Vec<RewriteRule> {
    use Matcher::Literal;

    vec![
        RewriteRule::word("logical and", Literal("&&"), v.and()),
        RewriteRule::word("logical or", Literal("||"), v.or()),
        RewriteRule::removal("punctuation", Matcher::Pattern(&PUNCTUATION)),
        RewriteRule::word("bitwise and", Literal("&"), v.and()),
        RewriteRule::word("bitwise or", Literal("|"), v.or()),
        RewriteRule::word("bitwise xor", Literal("^"), v.xor()),
        RewriteRule::word("bitwise not", Literal("~"), v.not()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapse(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_longer_operators_win() {
        let table = RuleTable::process(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("a <= b")), "a lt equals b");
        assert_eq!(collapse(&table.apply("a != b")), "a not equals b");
        assert_eq!(collapse(&table.apply("i += 1")), "i increment 1");
        assert_eq!(collapse(&table.apply("i++")), "i increment");
        assert_eq!(collapse(&table.apply("a // b")), "a floor div b");
        assert_eq!(collapse(&table.apply("a ** 2")), "a power 2");
    }

    #[test]
    fn test_indexing_runs_before_bracket_stripping() {
        let table = RuleTable::process(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("nums[i]")), "array element");
        assert_eq!(collapse(&table.apply("grid[i][j]")), "array element element");
        assert_eq!(collapse(&table.apply("a[b[c]]")), "array element");
        assert_eq!(collapse(&table.apply("[0]")), "element");
    }

    #[test]
    fn test_calls_and_members() {
        let table = RuleTable::process(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("len(nums)")), "length");
        assert_eq!(collapse(&table.apply("range(5)")), "range");
        assert_eq!(collapse(&table.apply("items.pop()")), "items method");
        assert_eq!(collapse(&table.apply("self.total")), "property");
        assert_eq!(collapse(&table.apply("print(i)")), "function call");
        assert_eq!(collapse(&table.apply("go()")), "function call");
    }

    #[test]
    fn test_identifiers_are_despaced() {
        let table = RuleTable::process(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("nums_sorted")), "nums sorted");
        assert_eq!(collapse(&table.apply("max_so_far")), "max so far");
    }

    #[test]
    fn test_punctuation() {
        let table = RuleTable::process(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("a && b || c")), "a and b or c");
        assert_eq!(collapse(&table.apply("ok? yes!")), "ok yes");
        assert_eq!(collapse(&table.apply("a ^ ~b")), "a xor not b");
        assert_eq!(collapse(&table.apply("\"quoted\"")), "quoted");
    }

    #[test]
    fn test_decision_cascade() {
        let table = RuleTable::decision(&Vocabulary::default());
        assert_eq!(collapse(&table.apply("nums[i] > 0")), "check array gt 0");
        assert_eq!(collapse(&table.apply("left <= right")), "left lt equals right");
    }

    #[test]
    fn test_vocabulary_is_used() {
        let vocabulary: Vocabulary = serde_json::from_str(r#"{"not_equals": "differs from"}"#)
            .expect("valid vocabulary");
        let table = RuleTable::process(&vocabulary);
        assert_eq!(collapse(&table.apply("a != b")), "a differs from b");
    }

    #[test]
    fn test_rule_names_are_unique() {
        let table = RuleTable::process(&Vocabulary::default());
        let mut names: Vec<_> = table.rules().iter().map(RewriteRule::name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
