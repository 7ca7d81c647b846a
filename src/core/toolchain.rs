//! The final `go generate` invocation.

use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;

/// Total attempts: the first run plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Common causes of a failing generation step, printed after the retry fails.
pub const TOOLCHAIN_HINTS: &[&str] = &[
    "GOROOT must be set to where golang is installed, minimum version go1.7",
    "GOPATH must be the workspace root (https://golang.org/doc/code.html)",
    "protoc must be in PATH",
    "protoc-gen-go must be in PATH (https://github.com/golang/protobuf)",
    "go get -u github.com/golang/protobuf/{proto,protoc-gen-go}",
];

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("generate command is empty")]
    EmptyCommand,
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Exit { command: String, status: ExitStatus },
}

#[derive(Debug)]
pub enum ToolchainOutcome {
    /// Not run (e.g. `--skip-toolchain`).
    Skipped,
    Succeeded { attempts: u32 },
    Failed { error: ToolchainError },
}

impl ToolchainOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ToolchainOutcome::Failed { .. })
    }
}

/// Runs the configured generate command in the working root.
#[derive(Debug, Clone)]
pub struct Toolchain {
    command: Vec<String>,
    dir: PathBuf,
}

impl Toolchain {
    pub fn new(command: Vec<String>, dir: &Path) -> Self {
        Self {
            command,
            dir: dir.to_path_buf(),
        }
    }

    pub fn display_command(&self) -> String {
        self.command.join(" ")
    }

    /// Run once; on failure, retry exactly once.
    pub fn run_with_retry(&self) -> ToolchainOutcome {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.run_once() {
                Ok(()) => return ToolchainOutcome::Succeeded { attempts },
                Err(error) if attempts >= MAX_ATTEMPTS => {
                    return ToolchainOutcome::Failed { error };
                }
                Err(error) => {
                    tracing::warn!(%error, "generate command failed, retrying");
                }
            }
        }
    }

    fn run_once(&self) -> Result<(), ToolchainError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(ToolchainError::EmptyCommand);
        };
        tracing::debug!(command = %self.display_command(), dir = %self.dir.display(), "running generate command");

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .status()
            .map_err(|source| ToolchainError::Spawn {
                command: self.display_command(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolchainError::Exit {
                command: self.display_command(),
                status,
            })
        }
    }
}
