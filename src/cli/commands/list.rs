use anyhow::Result;

use super::super::args::ListCommand;
use super::{CommandResult, CommandSummary, ListSummary, helper::finish};
use crate::core::{GenerateContext, list_definitions};

pub fn list(cmd: ListCommand) -> Result<CommandResult> {
    let ctx = GenerateContext::new(&cmd.args.common)?;
    let definitions = list_definitions(&ctx)?;

    Ok(finish(
        CommandSummary::List(ListSummary { definitions }),
        Vec::new(),
        false,
    ))
}
