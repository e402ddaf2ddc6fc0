// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The pipeline talks to a `CommandRunner` instead of spawning processes
//! directly. Production code uses [`super::ShellCommandRunner`]; tests
//! provide a runner that records commands and returns canned outcomes.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Result;

/// A shell command line to run in a given directory.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Short name used in logs (e.g. `"generator"`).
    pub label: String,
    /// Full command line, interpreted by the platform shell.
    pub cmd: String,
    pub cwd: PathBuf,
    /// Extra environment variables for the child.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(label: impl Into<String>, cmd: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            cmd: cmd.into(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr, for commands that may print to either.
    pub fn combined(&self) -> String {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Last few stderr lines, used to enrich error messages.
    pub fn stderr_tail(&self, lines: usize) -> String {
        let start = self.stderr.len().saturating_sub(lines);
        self.stderr[start..].join("\n")
    }
}

/// Trait abstracting how external commands are executed.
///
/// An `Err` means the process could not be run at all (e.g. spawn failure);
/// a process that ran and exited non-zero is an `Ok` with that exit code.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>>;
}
