//! Scripted command runner for tests.

use anyhow::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::process::{CommandOutput, CommandRunner, ToolCommand};

/// Records commands and answers them from a script.
///
/// Responses are matched by argument prefix in the order they were added, so
/// register longer prefixes first (`["list", "-m", "-f"]` before
/// `["list", "-m"]`). Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(Vec<String>, CommandOutput)>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl RecordingRunner {
    /// Creates a runner where every command succeeds silently.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers commands whose arguments start with `prefix` with `output`.
    #[must_use]
    pub fn respond(mut self, prefix: &[&str], output: CommandOutput) -> Self {
        self.responses.push((prefix.iter().map(ToString::to_string).collect(), output));
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<ToolCommand>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All commands run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.recorded().clone()
    }

    /// Commands whose arguments start with `prefix`.
    #[must_use]
    pub fn calls_matching(&self, prefix: &[&str]) -> Vec<ToolCommand> {
        self.recorded().iter().filter(|c| c.args_start_with(prefix)).cloned().collect()
    }

    /// Number of commands whose arguments start with `prefix`.
    #[must_use]
    pub fn count_matching(&self, prefix: &[&str]) -> usize {
        self.recorded().iter().filter(|c| c.args_start_with(prefix)).count()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        tracing::debug!(target: "process", "Recorded command: {}", command);
        self.recorded().push(command.clone());

        let output = self
            .responses
            .iter()
            .find(|(prefix, _)| {
                let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                command.args_start_with(&prefix)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::success_with(""));
        Ok(output)
    }
}
