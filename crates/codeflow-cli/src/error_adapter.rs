//! Terminal reports for Codeflow errors.
//!
//! A failed `check` yields one report per grammar diagnostic, each pointing
//! into the checked diagram with its error code (`E201`, ...) and a hint.
//! Every other failure (unreadable files, bad configuration, empty source, a
//! corrupt history file) becomes a single report coded `codeflow::<area>`.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use codeflow::CodeflowError;
use codeflow_parser::{
    Span,
    error::{Diagnostic, Severity},
};

/// A grammar diagnostic together with the diagram it points into.
pub struct GrammarReport<'a> {
    diag: &'a Diagnostic,
    diagram: &'a str,
}

impl<'a> GrammarReport<'a> {
    pub fn new(diag: &'a Diagnostic, diagram: &'a str) -> Self {
        Self { diag, diagram }
    }
}

impl fmt::Debug for GrammarReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarReport")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for GrammarReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for GrammarReport<'_> {}

impl MietteDiagnostic for GrammarReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Warning => MietteSeverity::Warning,
            Severity::Error => MietteSeverity::Error,
        })
    }

    /// The diagnostic's own hint, else the meaning of its error code.
    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match (self.diag.help(), self.diag.code()) {
            (Some(help), _) => Some(Box::new(help)),
            (None, Some(code)) => Some(Box::new(code.description())),
            (None, None) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.diagram as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = source_span(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// A failure with no position in a diagram.
pub struct ErrorReport<'a>(pub &'a CodeflowError);

impl fmt::Debug for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorReport<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorReport<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CodeflowError::Io(_) => "codeflow::io",
            CodeflowError::Parse { .. } => return None,
            CodeflowError::EmptySource => "codeflow::source",
            CodeflowError::Config(_) => "codeflow::config",
            CodeflowError::History(_) => "codeflow::history",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            CodeflowError::EmptySource => "the input file contains no code",
            CodeflowError::Config(_) => {
                "pass --config to pick a file, or remove codeflow/config.toml to use the defaults"
            }
            CodeflowError::History(_) => {
                "delete the history file or pass --history-file to use another one"
            }
            CodeflowError::Io(_) | CodeflowError::Parse { .. } => return None,
        };
        Some(Box::new(help))
    }
}

/// One rendered unit of a failed run.
#[derive(Debug)]
pub enum Reportable<'a> {
    Grammar(GrammarReport<'a>),
    Error(ErrorReport<'a>),
}

impl Reportable<'_> {
    fn inner(&self) -> &dyn MietteDiagnostic {
        match self {
            Reportable::Grammar(report) => report,
            Reportable::Error(report) => report,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Grammar(_) => None,
            Reportable::Error(report) => std::error::Error::source(report),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<MietteSeverity> {
        self.inner().severity()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Split `err` into the reports printed for it: one per grammar diagnostic
/// for a failed check, a single one otherwise.
pub fn to_reportables(err: &CodeflowError) -> Vec<Reportable<'_>> {
    match err {
        CodeflowError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Grammar(GrammarReport::new(diag, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorReport(err))],
    }
}

/// Report for a warning raised by a successful check.
pub fn warning_reportable<'a>(diag: &'a Diagnostic, diagram: &'a str) -> Reportable<'a> {
    Reportable::Grammar(GrammarReport::new(diag, diagram))
}
