//! Diagnostics collected during a run.
//!
//! None of these abort generation: a skipped file simply contributes no plugin
//! symbols, and a failed toolchain run leaves everything already written in
//! place.

use std::fmt;

use crate::core::{aggregate::AggregateError, toolchain::TOOLCHAIN_HINTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NoKeyMessage,
    MissingPackage,
    ConflictingPackage,
    Toolchain,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::NoKeyMessage => "no-key-message",
            Rule::MissingPackage => "missing-package",
            Rule::ConflictingPackage => "conflicting-package",
            Rule::Toolchain => "toolchain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Definition declares no `_KEYS` message; no plugin symbols.
    NoKeyMessage { file: String },
    /// Definition could not join the aggregate plugin.
    Aggregate(AggregateError),
    /// Generate command failed twice.
    ToolchainFailed { command: String, error: String },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ToolchainFailed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::NoKeyMessage { .. } => Rule::NoKeyMessage,
            Issue::Aggregate(AggregateError::MissingPackage { .. }) => Rule::MissingPackage,
            Issue::Aggregate(AggregateError::ConflictingPackage { .. }) => {
                Rule::ConflictingPackage
            }
            Issue::ToolchainFailed { .. } => Rule::Toolchain,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::NoKeyMessage { file } => format!("skipping plugin build for {}", file),
            Issue::Aggregate(err) => err.to_string(),
            Issue::ToolchainFailed { command, error } => {
                format!("`{}` did not run clean: {}", command, error)
            }
        }
    }

    /// Follow-up lines printed under the message.
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            Issue::ToolchainFailed { .. } => TOOLCHAIN_HINTS.to_vec(),
            Issue::Aggregate(AggregateError::MissingPackage { .. }) => {
                vec!["add a `package` declaration so the symbols can be qualified"]
            }
            _ => Vec::new(),
        }
    }
}
