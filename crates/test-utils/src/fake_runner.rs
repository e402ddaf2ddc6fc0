use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use invoicebot::exec::{CommandOutput, CommandRunner, CommandSpec};

type SideEffect = Box<dyn Fn() + Send + Sync>;

/// Canned outcome for one command label.
pub struct FakeResponse {
    output: CommandOutput,
    effect: Option<SideEffect>,
}

impl FakeResponse {
    pub fn ok() -> Self {
        Self::exit(0)
    }

    pub fn exit(code: i32) -> Self {
        Self {
            output: CommandOutput {
                exit_code: code,
                ..CommandOutput::default()
            },
            effect: None,
        }
    }

    pub fn stdout(mut self, line: &str) -> Self {
        self.output.stdout.push(line.to_string());
        self
    }

    pub fn stderr(mut self, line: &str) -> Self {
        self.output.stderr.push(line.to_string());
        self
    }

    /// Run `effect` whenever the command is executed, e.g. to create the
    /// generator's output in a `MockFileSystem`.
    pub fn then(mut self, effect: impl Fn() + Send + Sync + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }
}

/// A command that the fake runner was asked to execute.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub label: String,
    pub cmd: String,
    pub env: Vec<(String, String)>,
}

/// A fake runner that:
/// - records every command it was asked to run
/// - answers by label (`checkout`, `runtime`, `install`, `generator`)
/// - succeeds with no output for labels without a response
///
/// The `runtime` label answers `Python 3.10.12` unless overridden.
pub struct FakeCommandRunner {
    responses: HashMap<String, FakeResponse>,
    executed: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(
            "runtime".to_string(),
            FakeResponse::ok().stdout("Python 3.10.12"),
        );
        Self {
            responses,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn on(mut self, label: &str, response: FakeResponse) -> Self {
        self.responses.insert(label.to_string(), response);
        self
    }

    /// Shared handle to the list of executed commands.
    pub fn executed(&self) -> Arc<Mutex<Vec<RecordedCommand>>> {
        Arc::clone(&self.executed)
    }
}

impl Default for FakeCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut guard = self.executed.lock().unwrap();
                guard.push(RecordedCommand {
                    label: spec.label.clone(),
                    cmd: spec.cmd.clone(),
                    env: spec.env.clone(),
                });
            }

            match self.responses.get(&spec.label) {
                Some(response) => {
                    if let Some(effect) = &response.effect {
                        effect();
                    }
                    Ok(response.output.clone())
                }
                None => Ok(CommandOutput::default()),
            }
        })
    }
}

/// Labels of the recorded commands, in order.
pub fn labels(executed: &Arc<Mutex<Vec<RecordedCommand>>>) -> Vec<String> {
    executed
        .lock()
        .unwrap()
        .iter()
        .map(|c| c.label.clone())
        .collect()
}
