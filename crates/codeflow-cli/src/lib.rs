//! CLI logic for the Codeflow flowchart tool.
//!
//! Every subcommand reads its input from a file and writes its result to a
//! file or standard output. Analyses run offline unless a recorded model
//! reply is supplied with `--response`.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{info, warn};

use codeflow::{Analyzer, CodeflowError, UpstreamError, history::History, structure::FlowGraph};

/// Read the model reply recorded at `response`.
///
/// Without a recorded reply the model counts as unreachable, so the analyzer
/// falls back to its offline analysis.
fn recorded_reply(response: Option<&Path>) -> Result<String, UpstreamError> {
    let Some(path) = response else {
        return Err(UpstreamError::Transport(
            "no model reply supplied".to_string(),
        ));
    };
    fs::read_to_string(path)
        .map_err(|err| UpstreamError::Transport(format!("cannot read {}: {err}", path.display())))
}

/// Run the Codeflow CLI application
///
/// # Errors
///
/// Returns `CodeflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Grammar errors reported by `check`
/// - Empty source files given to `analyze`
/// - Unreadable history files
pub fn run(args: &Args) -> Result<(), CodeflowError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let analyzer = Analyzer::new(app_config);

    match &args.command {
        Command::Analyze {
            input,
            response,
            output,
            no_history,
        } => {
            info!(input_path = input, response_path:? = response; "Analyzing source");
            let source = fs::read_to_string(input)?;
            let reply = recorded_reply(response.as_deref().map(Path::new));
            let analysis = analyzer.analyze_reply(&source, reply)?;

            let record = !no_history && analyzer.config().history().enabled();
            if let (true, Some(path)) = (record, config::history_path(args.history_file.as_ref())) {
                let mut history = History::load(&path, analyzer.config().history())?;
                history.record(source.as_str());
                history.save(&path)?;
            }

            if let Some(notice) = analysis.notice() {
                warn!(notice; "Analysis fell back");
            }
            let json = serde_json::to_string_pretty(&analysis).map_err(io::Error::from)?;
            emit(output.as_deref(), &json)
        }
        Command::Sanitize { input, output } => {
            info!(input_path = input; "Sanitizing diagram");
            let diagram = fs::read_to_string(input)?;
            emit(output.as_deref(), &analyzer.sanitize(&diagram))
        }
        Command::Synthesize { input, output } => {
            info!(input_path = input; "Synthesizing diagram");
            let source = fs::read_to_string(input)?;
            emit(output.as_deref(), &analyzer.synthesize(&source))
        }
        Command::Check { input } => {
            info!(input_path = input; "Checking diagram");
            let diagram = fs::read_to_string(input)?;
            let checked = analyzer.check(&diagram)?;
            let reporter = miette::GraphicalReportHandler::new();
            for warning in checked.warnings() {
                let mut writer = String::new();
                let reportable = error_adapter::warning_reportable(warning, &diagram);
                if reporter.render_report(&mut writer, &reportable).is_ok() {
                    warn!(code:? = warning.code(); "{writer}");
                }
            }

            let graph = FlowGraph::from_flowchart(checked.flowchart());
            let summary = format!(
                "{input}: {} nodes, {} edges, {} decisions, {} cycles",
                graph.node_count(),
                graph.edge_count(),
                graph.decision_count(),
                graph.cycle_count()
            );
            emit(None, &summary)
        }
        Command::History => {
            let Some(path) = config::history_path(args.history_file.as_ref()) else {
                warn!("No history location available");
                return Ok(());
            };
            let history = History::load(&path, analyzer.config().history())?;
            let listing = history
                .entries()
                .map(|entry| {
                    let first_line = entry.code().lines().next().unwrap_or_default();
                    format!("{}\t{}\t{first_line}", entry.id(), entry.timestamp())
                })
                .collect::<Vec<_>>()
                .join("\n");
            emit(None, &listing)
        }
    }
}

/// Write `content` to `output`, or to standard output when no path is given.
fn emit(output: Option<&str>, content: &str) -> Result<(), CodeflowError> {
    match output {
        Some(path) => {
            fs::write(Path::new(path), content)?;
            info!(output_file = path; "Output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{content}")?;
        }
    }
    Ok(())
}
