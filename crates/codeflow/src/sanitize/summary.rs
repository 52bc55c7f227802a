//! Replacement phrases for labels that stay too long after rewriting.
//!
//! The rewrite cascade injects operator words into the text; the summary
//! reads them back to pick a short, generic phrase. Operator words and short
//! keywords match whole words, longer keywords match as word stems.

use crate::config::Vocabulary;

/// Phrase used when no category matches, and for labels rewritten to nothing.
pub(crate) const PROCESS_FALLBACK: &str = "Process data";

/// Phrase for every overlong or emptied decision label.
pub(crate) const DECISION_FALLBACK: &str = "condition";

/// A word cue looked for in the rewritten label.
#[derive(Debug, Clone)]
enum Cue {
    /// A word or phrase matching whole words, ignoring case.
    Phrase(Vec<String>),
    /// A prefix of a single word, ignoring case.
    Stem(&'static str),
}

impl Cue {
    fn phrase(text: &str) -> Self {
        Cue::Phrase(text.split_whitespace().map(str::to_lowercase).collect())
    }

    fn matches(&self, words: &[String]) -> bool {
        match self {
            Cue::Phrase(phrase) => {
                !phrase.is_empty()
                    && words
                        .windows(phrase.len())
                        .any(|window| window == phrase.as_slice())
            }
            Cue::Stem(stem) => words.iter().any(|word| word.starts_with(stem)),
        }
    }
}

/// A replacement phrase with the cues selecting it.
///
/// Every group must have at least one matching cue.
#[derive(Debug, Clone)]
struct Category {
    phrase: &'static str,
    groups: Vec<Vec<Cue>>,
}

impl Category {
    fn matches(&self, words: &[String]) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|cue| cue.matches(words)))
    }
}

/// Ordered replacement categories; the first match wins.
#[derive(Debug, Clone)]
pub(crate) struct Summary {
    categories: Vec<Category>,
}

impl Summary {
    pub fn new(v: &Vocabulary) -> Self {
        let compare = vec![
            Cue::phrase(v.less_than()),
            Cue::phrase(v.greater_than()),
            Cue::Stem("compar"),
        ];
        let assign = vec![Cue::phrase(v.assign())];
        let adds = vec![Cue::phrase(v.plus()), Cue::phrase(v.increment())];
        let update = vec![
            Cue::phrase(v.assign()),
            Cue::Stem("assign"),
            Cue::phrase(v.equals()),
        ];
        let increment = vec![
            Cue::phrase(v.increment()),
            Cue::Stem("increment"),
            Cue::phrase(v.plus()),
        ];

        let categories = vec![
            Category {
                phrase: "Compare values",
                groups: vec![compare],
            },
            // An assignment that adds to a value reads as an increment.
            Category {
                phrase: "Increment",
                groups: vec![assign, adds],
            },
            Category {
                phrase: "Update variable",
                groups: vec![update],
            },
            Category {
                phrase: "Increment",
                groups: vec![increment],
            },
            Category {
                phrase: "Return result",
                groups: vec![vec![Cue::Stem("return")]],
            },
            Category {
                phrase: "Loop condition",
                groups: vec![vec![
                    Cue::phrase("while"),
                    Cue::Stem("loop"),
                    Cue::Stem("iterat"),
                ]],
            },
            Category {
                phrase: "Check condition",
                groups: vec![vec![Cue::phrase("if"), Cue::Stem("check")]],
            },
        ];

        Self { categories }
    }

    /// Pick the replacement phrase for an overlong process label.
    pub fn summarize(&self, text: &str) -> &'static str {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        self.categories
            .iter()
            .find(|category| category.matches(&words))
            .map_or(PROCESS_FALLBACK, |category| category.phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(text: &str) -> &'static str {
        Summary::new(&Vocabulary::default()).summarize(text)
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(summarize("array element lt array element plus 1"), "Compare values");
        assert_eq!(summarize("array element assign array element plus 1"), "Increment");
        assert_eq!(summarize("total assign total times factor"), "Update variable");
        assert_eq!(summarize("a equals b"), "Update variable");
        assert_eq!(summarize("counter increment"), "Increment");
        assert_eq!(summarize("returns the final answer"), "Return result");
        assert_eq!(summarize("While more items remain"), "Loop condition");
        assert_eq!(summarize("iterate over items"), "Loop condition");
        assert_eq!(summarize("if the value is positive"), "Check condition");
        assert_eq!(summarize("checking the value"), "Check condition");
        assert_eq!(summarize("something else entirely"), "Process data");
    }

    #[test]
    fn test_short_words_match_whole_words_only() {
        // `result` contains `lt`, `shift` contains `if`
        assert_eq!(summarize("result shift"), "Process data");
    }

    #[test]
    fn test_multi_word_vocabulary() {
        let vocabulary: Vocabulary =
            serde_json::from_str(r#"{"less_than": "less than"}"#).expect("valid vocabulary");
        let summary = Summary::new(&vocabulary);
        assert_eq!(summary.summarize("a less than b"), "Compare values");
        assert_eq!(summary.summarize("less is more than enough"), "Process data");
    }
}
