//! Report formatting and printing utilities.
//!
//! Separate from the core so protoplug can be used as a library without
//! printing side effects.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, GenerateSummary, InitSummary, ListSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::toolchain::ToolchainOutcome;
use crate::issues::{Issue, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a command result to stdout.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Generate(summary) => {
            print_generate_header(summary, writer);
            for issue in &result.issues {
                print_issue(issue, writer);
            }
            print_generate(summary, verbose, writer);
        }
        CommandSummary::List(summary) => print_list(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );

    for hint in issue.hints() {
        let _ = writeln!(writer, "  {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }
}

fn print_generate_header<W: Write>(summary: &GenerateSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "Reading protos from: {}",
        summary.source_root.display()
    );
    let _ = writeln!(
        writer,
        "Target directory for generated proto bindings: {}",
        summary.target_root.display()
    );
    if summary.plugin {
        let _ = writeln!(
            writer,
            "Target directory for plugins: {}",
            summary.target_root.display()
        );
    }
}

fn print_generate<W: Write>(summary: &GenerateSummary, verbose: bool, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Linked {} proto {} ({} new, {} existing)",
            summary.definitions,
            plural(summary.definitions, "file", "files"),
            summary.links_created,
            summary.links_existing
        )
        .green()
    );
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Added {} go:generate {} ({} already present)",
            summary.directives_written,
            plural(summary.directives_written, "directive", "directives"),
            summary.directives_present
        )
        .green()
    );
    if verbose && summary.excluded > 0 {
        let _ = writeln!(
            writer,
            "  {} {} excluded by the exception list",
            summary.excluded,
            plural(summary.excluded, "file", "files")
        );
    }

    if summary.plugin {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Wrote {} plugin {}",
                summary.stubs_written,
                plural(summary.stubs_written, "stub", "stubs")
            )
            .green()
        );
    }

    if let Some((path, entries)) = &summary.aggregate {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Wrote {} with {} symbol {}",
                path.display(),
                entries,
                plural(*entries, "entry", "entries")
            )
            .green()
        );
    }

    match &summary.toolchain {
        ToolchainOutcome::Skipped => {
            let _ = writeln!(
                writer,
                "Skipped `{}`",
                summary.toolchain_command.cyan()
            );
        }
        ToolchainOutcome::Succeeded { attempts } => {
            let retried = if *attempts > 1 { " after retry" } else { "" };
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("`{}` succeeded{}", summary.toolchain_command, retried).green()
            );
        }
        ToolchainOutcome::Failed { .. } => {
            let _ = writeln!(
                writer,
                "{} {}",
                FAILURE_MARK.red(),
                format!("`{}` failed", summary.toolchain_command).red()
            );
        }
    }

    let _ = writeln!(writer, "Done.");
}

fn print_list<W: Write>(summary: &ListSummary, writer: &mut W) {
    for definition in &summary.definitions {
        let package = definition.package.as_deref().unwrap_or("-");
        match &definition.symbols {
            Some((key, content)) => {
                let _ = writeln!(
                    writer,
                    "{}  {}  {} {}",
                    definition.source_path.display(),
                    package.cyan(),
                    key,
                    content
                );
            }
            None => {
                let _ = writeln!(
                    writer,
                    "{}  {}  {}",
                    definition.source_path.display(),
                    package.cyan(),
                    "(no key message)".dimmed()
                );
            }
        }
    }

    let count = summary.definitions.len();
    let with_symbols = summary
        .definitions
        .iter()
        .filter(|d| d.symbols.is_some())
        .count();
    let _ = writeln!(
        writer,
        "{} proto {}, {} with plugin symbols",
        count,
        plural(count, "file", "files"),
        with_symbols
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

// ============================================================
// Tests
// ============================================================
