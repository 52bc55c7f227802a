use clap::{Parser, Subcommand};

/// Command-line arguments for the Codeflow tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the history file, overriding the platform data directory
    #[arg(long, global = true)]
    pub history_file: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explain a source file and produce its flowchart as JSON
    Analyze {
        /// Path to the source file
        input: String,

        /// Recorded model reply to use instead of an offline analysis
        #[arg(short, long)]
        response: Option<String>,

        /// Write the analysis here instead of standard output
        #[arg(short, long)]
        output: Option<String>,

        /// Do not record this analysis in the history
        #[arg(long)]
        no_history: bool,
    },

    /// Rewrite node labels of a flowchart so they satisfy the grammar
    Sanitize {
        /// Path to the flowchart file
        input: String,

        /// Write the result here instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Synthesize a fallback flowchart from a source file
    Synthesize {
        /// Path to the source file
        input: String,

        /// Write the diagram here instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check a flowchart against the grammar
    Check {
        /// Path to the flowchart file
        input: String,
    },

    /// List recent analyses, newest first
    History,
}
