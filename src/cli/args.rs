//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Mirror protos, write go:generate directives, synthesize plugin sources
//! - `list`: Show discovered protos and the Go symbols they contribute
//! - `init`: Initialize protoplug configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.args.common.verbose,
            Some(Command::List(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Working root; generated absolute paths are anchored here (default: current directory)
    #[arg(long, env = "PROTOPLUG_ROOT")]
    pub root: Option<PathBuf>,

    /// Source directory to look for protos, relative to the root (overrides config file)
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Target directory for generated bindings, relative to the root (overrides config file)
    #[arg(long)]
    pub dst: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write a plugin stub for every proto declaring a _KEYS message
    #[arg(long)]
    pub plugin: bool,

    /// Write one plugin source including all proto symbols, building ARTIFACT
    #[arg(long, value_name = "ARTIFACT")]
    pub plugin_all: Option<String>,

    /// Do not run the generate command at the end
    #[arg(long)]
    pub skip_toolchain: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub args: ListArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Link protos into the target tree, add go:generate directives and run go generate
    Generate(GenerateCommand),
    /// List discovered protos with their package and plugin symbols
    List(ListCommand),
    /// Initialize a new .protoplugrc.json configuration file
    Init,
}
