//! The model boundary: ask the model, fall back to offline analysis.
//!
//! [`Analyzer::analyze`] always produces an explanation and a renderable
//! diagram for non-empty source. Whatever goes wrong on the model side
//! (transport, an undecodable reply, a diagram that stays invalid after
//! sanitizing) is absorbed here and replaced by the offline path.

use log::{debug, info, warn};
use thiserror::Error;

use codeflow_core::analysis::{Analysis, AnalysisSource, Explanation};
use codeflow_parser::Checked;

use crate::{
    config::AppConfig,
    error::CodeflowError,
    explain::explain,
    fallback::Synthesizer,
    history::History,
    prompt,
    response::{self, DecodeError},
    sanitize::Sanitizer,
};

/// Notice attached when the model could not be reached.
pub const OFFLINE_NOTICE: &str = "Using offline analysis due to server issues.";

/// Notice attached when the model replied but its diagram was unusable.
pub const SYNTHESIZED_NOTICE: &str =
    "The generated diagram could not be used; showing a synthesized diagram.";

/// Failure reported by a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by the model provider")]
    RateLimited,
}

/// A text generation backend.
///
/// Implementations own their transport; the engine only hands over the
/// prompt and reads back the raw reply.
pub trait Generator {
    /// Generate a reply for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] when no reply could be obtained.
    fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, UpstreamError>,
{
    fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self(prompt)
    }
}

/// Entry point for analyzing source code.
///
/// # Example
///
/// ```
/// use codeflow::{
///     Analyzer,
///     analyze::UpstreamError,
///     config::AppConfig,
/// };
/// use codeflow_core::analysis::AnalysisSource;
///
/// let analyzer = Analyzer::new(AppConfig::default());
/// let offline = |_: &str| -> Result<String, UpstreamError> { Err(UpstreamError::RateLimited) };
///
/// let analysis = analyzer.analyze("while True:\n    pass", &offline).unwrap();
/// assert_eq!(analysis.source(), AnalysisSource::Offline);
/// assert!(analysis.diagram().contains("Loop Condition"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AppConfig,
    sanitizer: Sanitizer,
    synthesizer: Synthesizer,
}

impl Analyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let sanitizer = Sanitizer::new(config.sanitizer());
        let synthesizer = Synthesizer::new(config.fallback());
        Self {
            config,
            sanitizer,
            synthesizer,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Sanitize the labels of a diagram.
    pub fn sanitize(&self, diagram: &str) -> String {
        self.sanitizer.sanitize(diagram)
    }

    /// Synthesize a fallback diagram for `source`.
    pub fn synthesize(&self, source: &str) -> String {
        self.synthesizer.synthesize(source)
    }

    /// Check `diagram` against the output grammar.
    ///
    /// # Errors
    ///
    /// Returns [`CodeflowError::Parse`] carrying every error diagnostic.
    pub fn check(&self, diagram: &str) -> Result<Checked, CodeflowError> {
        codeflow_parser::check(diagram)
            .map_err(|err| CodeflowError::new_parse_error(err, diagram))
    }

    /// Analyze `source` with the model behind `generator`.
    ///
    /// # Errors
    ///
    /// Returns [`CodeflowError::EmptySource`] for empty or blank source. Model
    /// failures never surface as errors.
    pub fn analyze(
        &self,
        source: &str,
        generator: &dyn Generator,
    ) -> Result<Analysis, CodeflowError> {
        ensure_source(source)?;
        info!(source_len = source.len(); "Analyzing source");

        let reply = generator.generate(&prompt::build(source));
        Ok(self.complete(source, reply))
    }

    /// Analyze `source` from an already obtained model reply.
    ///
    /// # Errors
    ///
    /// Returns [`CodeflowError::EmptySource`] for empty or blank source.
    pub fn analyze_reply(
        &self,
        source: &str,
        reply: Result<String, UpstreamError>,
    ) -> Result<Analysis, CodeflowError> {
        ensure_source(source)?;
        Ok(self.complete(source, reply))
    }

    /// Analyze `source` and record it in `history` when history is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`CodeflowError::EmptySource`] for empty or blank source;
    /// nothing is recorded then.
    pub fn analyze_recorded(
        &self,
        source: &str,
        generator: &dyn Generator,
        history: &mut History,
    ) -> Result<Analysis, CodeflowError> {
        let analysis = self.analyze(source, generator)?;
        if self.config.history().enabled() {
            history.record(source);
        }
        Ok(analysis)
    }

    /// Explain `source` and synthesize its diagram without the model.
    pub fn offline(&self, source: &str) -> Analysis {
        Analysis::new(
            explain(source),
            self.synthesize(source),
            AnalysisSource::Offline,
        )
    }

    fn complete(&self, source: &str, reply: Result<String, UpstreamError>) -> Analysis {
        let raw = match reply {
            Ok(raw) => raw,
            Err(err) => {
                warn!(err:%; "Model unavailable, analyzing offline");
                return self.offline(source).with_notice(OFFLINE_NOTICE);
            }
        };

        let reply = match response::decode(&raw) {
            Ok(reply) => reply,
            Err(DecodeError::Malformed) => {
                warn!("Model reply could not be decoded, analyzing offline");
                return self.offline(source).with_notice(OFFLINE_NOTICE);
            }
            Err(DecodeError::MissingDiagram { explanation }) => {
                warn!("Model reply has no diagram, synthesizing one");
                return self.synthesized(source, explanation);
            }
        };

        if reply.salvaged() {
            debug!("Using fields recovered from an invalid model reply");
        }
        let (explanation, raw_diagram) = reply.into_parts();
        let diagram = self.sanitize(&raw_diagram);

        match codeflow_parser::check(&diagram) {
            Ok(checked) if checked.flowchart().node_ids().is_empty() => {
                warn!("Sanitized model diagram has no nodes, synthesizing one");
                self.synthesized(source, explanation)
            }
            Ok(checked) => {
                info!(warnings = checked.warnings().len(); "Using sanitized model diagram");
                Analysis::new(
                    explanation.unwrap_or_else(|| explain(source)),
                    diagram,
                    AnalysisSource::Model,
                )
            }
            Err(err) => {
                warn!(
                    errors = err.errors().count(),
                    err:%;
                    "Sanitized model diagram failed the grammar check"
                );
                self.synthesized(source, explanation)
            }
        }
    }

    /// Synthesized diagram, keeping the model explanation when there is one.
    fn synthesized(&self, source: &str, explanation: Option<Explanation>) -> Analysis {
        Analysis::new(
            explanation.unwrap_or_else(|| explain(source)),
            self.synthesize(source),
            AnalysisSource::Offline,
        )
        .with_notice(SYNTHESIZED_NOTICE)
    }
}

fn ensure_source(source: &str) -> Result<(), CodeflowError> {
    if source.trim().is_empty() {
        return Err(CodeflowError::EmptySource);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    use crate::config::HistoryConfig;

    const SOURCE: &str = "for i in range(5):\n    print(i)";

    fn reply(text: &'static str) -> impl Fn(&str) -> Result<String, UpstreamError> {
        move |_| Ok(text.to_string())
    }

    #[test]
    fn test_model_diagram_is_sanitized() {
        let generator = reply(
            r#"{"explanation": "prints numbers", "diagram": "graph TD;\nA[Start] --> B{i < 5}\nB -->|Yes| C[print(i)]"}"#,
        );
        let analysis = Analyzer::default().analyze(SOURCE, &generator).unwrap();

        assert_eq!(analysis.source(), AnalysisSource::Model);
        assert_eq!(
            analysis.diagram(),
            "graph TD;\nA[Start] --> B{i lt 5}\nB -->|Yes| C[function call]"
        );
        assert_eq!(
            analysis.explanation(),
            &Explanation::Text("prints numbers".to_string())
        );
        assert_eq!(analysis.notice(), None);
    }

    #[test]
    fn test_prompt_carries_source() {
        let seen = RefCell::new(String::new());
        let generator = |prompt: &str| -> Result<String, UpstreamError> {
            *seen.borrow_mut() = prompt.to_string();
            Err(UpstreamError::Transport("connection refused".to_string()))
        };
        Analyzer::default().analyze(SOURCE, &generator).unwrap();
        assert!(seen.borrow().ends_with(SOURCE));
    }

    fn unavailable(_: &str) -> Result<String, UpstreamError> {
        Err(UpstreamError::RateLimited)
    }

    #[test]
    fn test_upstream_error_falls_back() {
        let analysis = Analyzer::default().analyze(SOURCE, &unavailable).unwrap();

        assert_eq!(analysis.source(), AnalysisSource::Offline);
        assert_eq!(analysis.notice(), Some(OFFLINE_NOTICE));
        assert!(analysis.diagram().contains("E -->|Continue| F[Loop Body]"));
        assert!(
            analysis
                .explanation()
                .to_string()
                .contains("**Key Features**: Iterative Loops\n")
        );
    }

    #[test]
    fn test_missing_diagram_keeps_explanation() {
        let generator = reply(r#"{"explanation": "prints numbers", "diagram": ""}"#);
        let analysis = Analyzer::default().analyze(SOURCE, &generator).unwrap();

        assert_eq!(analysis.source(), AnalysisSource::Offline);
        assert_eq!(analysis.notice(), Some(SYNTHESIZED_NOTICE));
        assert_eq!(
            analysis.explanation(),
            &Explanation::Text("prints numbers".to_string())
        );
        assert!(analysis.diagram().starts_with("graph TD\n"));
    }

    #[test]
    fn test_malformed_reply_falls_back() {
        let analysis = Analyzer::default()
            .analyze(SOURCE, &reply("Sorry, I can't do that."))
            .unwrap();
        assert_eq!(analysis.source(), AnalysisSource::Offline);
        assert_eq!(analysis.notice(), Some(OFFLINE_NOTICE));
    }

    #[test]
    fn test_invalid_model_diagram_falls_back() {
        let generator = reply(r#"{"diagram": "flowchart XY\nA --> B"}"#);
        let analysis = Analyzer::default().analyze(SOURCE, &generator).unwrap();
        assert_eq!(analysis.source(), AnalysisSource::Offline);
        assert!(analysis.diagram().contains("Loop Condition"));

        let header_only = reply(r#"{"diagram": "graph TD;"}"#);
        let analysis = Analyzer::default().analyze(SOURCE, &header_only).unwrap();
        assert_eq!(analysis.source(), AnalysisSource::Offline);
    }

    #[test]
    fn test_empty_source() {
        let generator = |_: &str| -> Result<String, UpstreamError> {
            panic!("the model is not consulted for empty source")
        };
        assert!(matches!(
            Analyzer::default().analyze("  \n\t", &generator),
            Err(CodeflowError::EmptySource)
        ));
    }

    #[test]
    fn test_analyze_recorded() {
        let generator = unavailable;
        let mut history = History::new(5);

        Analyzer::default()
            .analyze_recorded(SOURCE, &generator, &mut history)
            .unwrap();
        assert_eq!(history.entries().next().unwrap().code(), SOURCE);

        assert!(
            Analyzer::default()
                .analyze_recorded("", &generator, &mut history)
                .is_err()
        );
        assert_eq!(history.len(), 1);

        let disabled = Analyzer::new(AppConfig::new(
            Default::default(),
            Default::default(),
            HistoryConfig::new(false, 5),
        ));
        disabled
            .analyze_recorded(SOURCE, &generator, &mut history)
            .unwrap();
        assert_eq!(history.len(), 1);
    }
}
