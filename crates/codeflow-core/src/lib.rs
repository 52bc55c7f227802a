//! Codeflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Codeflow parser
//! and engine. It includes:
//!
//! - **Identifiers**: Flowchart node identifiers ([`identifier::NodeId`])
//! - **Flowchart**: The statement model of the restricted diagram grammar
//!   ([`flowchart`] module)
//! - **Features**: Structural feature flags detected in source code
//!   ([`features::FeatureFlags`])
//! - **Analysis**: The explanation and diagram pair handed to consumers
//!   ([`analysis`] module)

pub mod analysis;
pub mod features;
pub mod flowchart;
pub mod identifier;
