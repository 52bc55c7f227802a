//! Codeflow - explanations and flowcharts for source code.
//!
//! The engine sits between an untrusted text generator and a diagram
//! renderer. Model-generated flowcharts are decoded, their labels rewritten
//! into a small safe grammar and the result checked; when any of that fails,
//! a flowchart is synthesized from the source code alone.
//!
//! # Modules
//!
//! - [`sanitize`]: rewrite diagram labels into the label grammar
//! - [`fallback`]: synthesize a diagram from source code
//! - [`response`]: decode raw model replies
//! - [`analyze`]: the model boundary tying everything together
//! - [`history`]: a bounded list of recent submissions
//!
//! # Example
//!
//! ```
//! use codeflow::{Analyzer, analyze::UpstreamError};
//!
//! let reply = |_: &str| -> Result<String, UpstreamError> {
//!     Ok(r#"{"explanation": "adds one", "diagram": "graph TD;\nA[x = x + 1] --> B[End]"}"#.to_string())
//! };
//!
//! let analysis = Analyzer::default().analyze("x = x + 1", &reply).unwrap();
//! assert_eq!(analysis.diagram(), "graph TD;\nA[x assign x plus 1] --> B[End]");
//! ```

pub mod analyze;
pub mod config;
pub mod explain;
pub mod export;
pub mod fallback;
pub mod history;
pub mod prompt;
pub mod response;
pub mod sanitize;
pub mod structure;

mod error;

pub use codeflow_core::{analysis, features, flowchart, identifier};

pub use analyze::{Analyzer, Generator, UpstreamError};
pub use error::CodeflowError;
