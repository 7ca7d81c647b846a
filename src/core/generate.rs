//! The generation pipeline.
//!
//! 1. Discover definition files under the source root.
//! 2. Per file: link it into the target tree, record its `protoc` directive,
//!    and (on request) synthesize its plugin stub and aggregate entry.
//! 3. Write the aggregate plugin file, if requested.
//! 4. Run the external generate command, retrying once.
//!
//! Filesystem failures in steps 1-3 abort the run. Everything else is reported
//! as an [`Issue`] and generation carries on.

use std::path::PathBuf;

use anyhow::Result;

use super::{
    aggregate::{AggregatePlugin, SymbolEntry},
    context::GenerateContext,
    directive::{AppendOutcome, GenerationDirective, append_directive},
    identifier::to_camel_case,
    mirror::{DefinitionLocation, LinkOutcome, discover, link_definition},
    scanner::DefinitionFile,
    stub::synthesize_stub,
    toolchain::{Toolchain, ToolchainOutcome},
};
use crate::issues::Issue;

/// What to produce besides links and directives.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Write one plugin stub per definition file.
    pub plugin: bool,
    /// Write the aggregate plugin file building this artifact.
    pub aggregate_artifact: Option<String>,
    /// Run the generate command at the end.
    pub run_toolchain: bool,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub definitions: usize,
    pub excluded: usize,
    pub links_created: usize,
    pub links_existing: usize,
    pub directives_written: usize,
    pub directives_present: usize,
    /// Stub files written, absolute.
    pub stubs: Vec<PathBuf>,
    /// Aggregate file written and its entry count.
    pub aggregate: Option<(PathBuf, usize)>,
    pub toolchain: ToolchainOutcome,
    pub issues: Vec<Issue>,
}

pub fn generate(ctx: &GenerateContext, options: &GenerateOptions) -> Result<GenerateReport> {
    let layout = &ctx.layout;
    let discovery = discover(layout, &ctx.exceptions)?;
    tracing::info!(
        count = discovery.definitions.len(),
        source = %layout.source_root.display(),
        "discovered definition files"
    );

    let mut report = GenerateReport {
        definitions: discovery.definitions.len(),
        excluded: discovery.excluded.len(),
        links_created: 0,
        links_existing: 0,
        directives_written: 0,
        directives_present: 0,
        stubs: Vec::new(),
        aggregate: None,
        toolchain: ToolchainOutcome::Skipped,
        issues: Vec::new(),
    };

    let mut aggregate = options
        .aggregate_artifact
        .as_ref()
        .map(|artifact| AggregatePlugin::new(artifact.clone(), ctx.config.aggregate_file.clone()));

    for location in &discovery.definitions {
        let file = DefinitionFile::read(&layout.absolute(&location.source_path()), ctx.scanner())?;

        match link_definition(layout, location)? {
            LinkOutcome::Created => report.links_created += 1,
            LinkOutcome::AlreadyExists => report.links_existing += 1,
        }

        match write_directive(ctx, location, &file)? {
            AppendOutcome::Written => report.directives_written += 1,
            AppendOutcome::AlreadyPresent => report.directives_present += 1,
        }

        if file.names.key.is_none() {
            if options.plugin || aggregate.is_some() {
                report.issues.push(Issue::NoKeyMessage {
                    file: location.file_name.clone(),
                });
            }
            continue;
        }

        if options.plugin
            && let Some(stub) = synthesize_stub(&file, &location.target_dir, layout.root.as_path())
        {
            report.stubs.push(stub.write(&layout.root)?);
        }

        if let Some(aggregate) = aggregate.as_mut() {
            let pushed = SymbolEntry::from_definition(&file, &location.target_dir, &layout.root)
                .and_then(|entry| match entry {
                    Some(entry) => aggregate.push(entry, &location.source_path()),
                    None => Ok(()),
                });
            if let Err(err) = pushed {
                report.issues.push(Issue::Aggregate(err));
            }
        }
    }

    if let Some(aggregate) = &aggregate {
        let path = aggregate.write(&layout.root)?;
        tracing::info!(path = %path.display(), entries = aggregate.entries().len(), "wrote aggregate plugin");
        report.aggregate = Some((path, aggregate.entries().len()));
    }

    if options.run_toolchain {
        let toolchain = Toolchain::new(ctx.config.generate_command.clone(), &layout.root);
        report.toolchain = toolchain.run_with_retry();
        if let ToolchainOutcome::Failed { error } = &report.toolchain {
            report.issues.push(Issue::ToolchainFailed {
                command: toolchain.display_command(),
                error: error.to_string(),
            });
        }
    }

    Ok(report)
}

fn write_directive(
    ctx: &GenerateContext,
    location: &DefinitionLocation,
    file: &DefinitionFile,
) -> Result<AppendOutcome> {
    let layout = &ctx.layout;
    let target_dir = layout.absolute(&location.target_dir);
    let directive = GenerationDirective::new(&target_dir, location.file_name.clone());
    let log = target_dir.join(&ctx.config.directive_log);

    append_directive(&log, &directive, file.names.package.as_deref())
}

/// A discovered definition and the Go names it would contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedDefinition {
    pub source_path: PathBuf,
    pub package: Option<String>,
    /// Transformed key and content type names.
    pub symbols: Option<(String, String)>,
}

/// Read-only scan of the source tree.
pub fn list_definitions(ctx: &GenerateContext) -> Result<Vec<ListedDefinition>> {
    let layout = &ctx.layout;
    let discovery = discover(layout, &ctx.exceptions)?;

    discovery
        .definitions
        .iter()
        .map(|location| -> Result<ListedDefinition> {
            let source_path = location.source_path();
            let file = DefinitionFile::read(&layout.absolute(&source_path), ctx.scanner())?;
            let symbols = file
                .names
                .key
                .as_ref()
                .map(|key| (to_camel_case(&key.key), to_camel_case(&key.content)));
            Ok(ListedDefinition {
                source_path,
                package: file.names.package,
                symbols,
            })
        })
        .collect()
}
