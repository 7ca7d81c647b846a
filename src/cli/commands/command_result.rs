use std::path::PathBuf;

use crate::{
    core::{ListedDefinition, toolchain::ToolchainOutcome},
    issues::Issue,
};

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    List(ListSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    pub definitions: usize,
    pub excluded: usize,
    pub links_created: usize,
    pub links_existing: usize,
    pub directives_written: usize,
    pub directives_present: usize,
    pub stubs_written: usize,
    pub plugin: bool,
    /// Aggregate file written and its entry count.
    pub aggregate: Option<(PathBuf, usize)>,
    pub toolchain_command: String,
    pub toolchain: ToolchainOutcome,
}

#[derive(Debug)]
pub struct ListSummary {
    pub definitions: Vec<ListedDefinition>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running protoplug commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
    /// Diagnostics collected while running.
    pub issues: Vec<Issue>,
}
