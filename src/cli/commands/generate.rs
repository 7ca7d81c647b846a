use anyhow::Result;

use super::super::args::GenerateCommand;
use super::{CommandResult, CommandSummary, GenerateSummary, helper::finish};
use crate::core::{GenerateContext, GenerateOptions, generate as run_generate};

pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = GenerateContext::new(&args.common)?;

    let options = GenerateOptions {
        plugin: args.plugin,
        aggregate_artifact: args.plugin_all.clone(),
        run_toolchain: !args.skip_toolchain,
    };

    let report = run_generate(&ctx, &options)?;

    let summary = GenerateSummary {
        source_root: ctx.layout.source_root.clone(),
        target_root: ctx.layout.target_root.clone(),
        definitions: report.definitions,
        excluded: report.excluded,
        links_created: report.links_created,
        links_existing: report.links_existing,
        directives_written: report.directives_written,
        directives_present: report.directives_present,
        stubs_written: report.stubs.len(),
        plugin: args.plugin,
        aggregate: report.aggregate,
        toolchain_command: ctx.config.generate_command.join(" "),
        toolchain: report.toolchain,
    };

    Ok(finish(
        CommandSummary::Generate(summary),
        report.issues,
        true,
    ))
}
