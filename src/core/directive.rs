//! `go:generate` directives and the per-directory log they are kept in.
//!
//! The log (`gen.go` by default) is append-only. A directive is appended only
//! when its exact text is not already in the file, so rerunning over an
//! unchanged tree leaves every log untouched. The one exception is the
//! `package` clause: a log that has none gets it inserted at the top as soon
//! as some file in the directory declares a package.

use std::{
    fs::{self, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;

static PACKAGE_CLAUSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^package\s+\w+").expect("valid package clause regex"));

/// Default name of the per-directory directive log.
pub const DIRECTIVE_LOG_NAME: &str = "gen.go";

/// Instruction for `go generate` to run `protoc` on one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationDirective {
    /// Absolute mirrored directory; used both as output and include path.
    pub target_dir: PathBuf,
    pub file_name: String,
}

impl GenerationDirective {
    pub fn new(target_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            target_dir: target_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn render(&self) -> String {
        let dir = self.target_dir.display();
        format!(
            "\n//go:generate protoc --go_out=plugins=grpc:{} -I{} {}\n",
            dir, dir, self.file_name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Written,
    AlreadyPresent,
}

/// Append `directive` to the log at `path` unless it is already there.
///
/// A log without a `package` clause gets `package <package>` as its first
/// line when the package is known.
pub fn append_directive(
    path: &Path,
    directive: &GenerationDirective,
    package: Option<&str>,
) -> Result<AppendOutcome> {
    let mut log = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open directive log: {}", path.display()))?;

    let mut existing = String::new();
    log.read_to_string(&mut existing)
        .with_context(|| format!("Failed to read directive log: {}", path.display()))?;

    let text = directive.render();
    if existing.contains(&text) {
        return Ok(AppendOutcome::AlreadyPresent);
    }

    match package {
        Some(package) if !PACKAGE_CLAUSE_REGEX.is_match(&existing) => {
            drop(log);
            let content = format!("package {}\n{}{}", package, existing, text);
            fs::write(path, content)
        }
        _ => log.write_all(text.as_bytes()),
    }
    .with_context(|| format!("Failed to write directive log: {}", path.display()))?;

    Ok(AppendOutcome::Written)
}
