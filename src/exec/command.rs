// src/exec/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{CommandOutput, CommandRunner, CommandSpec};

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
///
/// Stdout lines are logged at `info`, stderr lines at `debug`; both are also
/// captured into the returned [`CommandOutput`].
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(run_command(spec))
    }
}

async fn run_command(spec: &CommandSpec) -> Result<CommandOutput> {
    info!(step = %spec.label, cmd = %spec.cmd, cwd = ?spec.cwd, "starting process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&spec.cmd);
        c
    };

    cmd.current_dir(&spec.cwd)
        .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for step '{}'", spec.label))?;

    // Drain both pipes concurrently so neither buffer fills up.
    let stdout_task = child
        .stdout
        .take()
        .map(|out| collect_lines(out, spec.label.clone(), Stream::Stdout));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| collect_lines(err, spec.label.clone(), Stream::Stderr));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{}'", spec.label))?;

    let stdout = join_lines(stdout_task).await?;
    let stderr = join_lines(stderr_task).await?;

    let exit_code = status.code().unwrap_or(-1);
    info!(
        step = %spec.label,
        exit_code,
        success = status.success(),
        "process exited"
    );

    Ok(CommandOutput {
        exit_code,
        stdout,
        stderr,
    })
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Drain `reader` to EOF, one line at a time.
///
/// Lines are decoded lossily: a stray non-UTF-8 byte must not stop the
/// drain, or the child blocks or dies on a closed pipe.
fn collect_lines<R>(reader: R, label: String, stream: Stream) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut collected = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    match stream {
                        Stream::Stdout => info!(step = %label, "stdout: {}", line),
                        Stream::Stderr => debug!(step = %label, "stderr: {}", line),
                    }
                    collected.push(line);
                }
                Err(err) => {
                    warn!(step = %label, error = %err, "stopped reading process output");
                    break;
                }
            }
        }
        collected
    })
}

async fn join_lines(task: Option<JoinHandle<Vec<String>>>) -> Result<Vec<String>> {
    match task {
        Some(handle) => handle.await.context("joining output reader task"),
        None => Ok(Vec::new()),
    }
}
